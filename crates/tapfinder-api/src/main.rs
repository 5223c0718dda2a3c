use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tapfinder_api::{create_router, ApiConfig, AppState};
use tapfinder_core::config::LayeredConfig;
use tapfinder_core::geocoding::{build_geocoder, Geocoder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tapfinder_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let config = LayeredConfig::with_defaults()
        .load_from_optional_file(&api_config.config_file)
        .with_context(|| format!("Failed to load {}", api_config.config_file.display()))?
        .load_from_env();

    if config.datasets.value.is_empty() {
        tracing::warn!(
            config_file = %api_config.config_file.display(),
            "No datasets configured; location endpoints will fail until `datasets` is set"
        );
    }

    let geocoder = build_geocoder(
        config.geocoder.value,
        &config.region.value,
        config.mapbox_token.value.as_deref(),
    )?;

    tracing::info!(
        port = api_config.port,
        geocoder = geocoder.name(),
        datasets = config.datasets.value.len(),
        cache_ttl_secs = config.cache_ttl_secs.value,
        "Starting Tapfinder API server"
    );

    let state = Arc::new(AppState::new(config, geocoder));

    let cors = CorsLayer::new()
        .allow_origin(
            api_config
                .cors_origin
                .parse::<HeaderValue>()
                .context("TAPFINDER_CORS_ORIGIN is not a valid header value")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await?;
    Ok(())
}
