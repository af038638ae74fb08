//! Device geolocation seam.
//!
//! Platform position APIs are callback-based and may never answer; this
//! wraps them behind an async trait with an explicit timeout so a refresh
//! cycle sees exactly one resolution.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Coordinates;

/// Device location errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this host")]
    Unsupported,

    #[error("location permission denied")]
    Denied,

    #[error("location request timed out")]
    Timeout,
}

/// Source of device coordinates
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Resolve the device position, bounding the wait.
pub async fn locate_with_timeout(
    geolocator: &dyn Geolocator,
    limit: Duration,
) -> Result<Coordinates, GeolocationError> {
    match tokio::time::timeout(limit, geolocator.locate()).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout),
    }
}

/// Default geolocator for hosts without a position service. Always reports
/// `Unsupported`, which sends callers down the default-city fallback chain.
pub struct UnsupportedGeolocator;

#[async_trait]
impl Geolocator for UnsupportedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
