mod cache;
mod geocode;
mod health;
mod locations;
mod nearby;

pub use cache::invalidate_cache;
pub use geocode::geocode;
pub use health::health_check;
pub use locations::list_locations;
pub use nearby::handle_nearby;
