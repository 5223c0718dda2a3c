mod nearby;

pub use nearby::NearbyService;
