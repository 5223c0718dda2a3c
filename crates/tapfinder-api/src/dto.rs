mod request;
mod response;

pub use request::{GeocodeQuery, NearbyRequest};
pub use response::{
    CacheInvalidateResponse, GeocodeResponse, HealthResponse, NearbyResponse, NearbyResult,
};
