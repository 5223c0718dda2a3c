use std::env;
use std::path::PathBuf;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,

    /// TOML file with the shared tapfinder settings (datasets, region, ...)
    pub config_file: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            config_file: PathBuf::from("tapfinder.toml"),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("TAPFINDER_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(defaults.port);

        let cors_origin = env::var("TAPFINDER_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let config_file =
            env::var("TAPFINDER_CONFIG").map(PathBuf::from).unwrap_or(defaults.config_file);

        Self { port, cors_origin, config_file }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
