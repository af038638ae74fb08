//! AeroPulse - location-aware weather and air-quality dashboard core
//!
//! This library resolves a location into coordinates, fetches forecast and
//! air-quality data from the Open-Meteo services, and reduces the raw
//! payloads into a stable, display-ready snapshot. Rendering, preference
//! storage, and device geolocation sit behind traits at the edges.

pub mod align;
pub mod api;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod geolocate;
pub mod location_resolver;
pub mod models;
pub mod sink;
pub mod store;

// Re-export core types for public API
pub use api::{OpenMeteoApi, OpenMeteoClient};
pub use config::AeroPulseConfig;
pub use coordinator::{Locus, RefreshOptions, RefreshOutcome, RequestCoordinator};
pub use error::{AeroPulseError, Service};
pub use geolocate::{GeolocationError, Geolocator, UnsupportedGeolocator};
pub use location_resolver::LocationResolver;
pub use models::{AirQualitySnapshot, Coordinates, Snapshot, UnitPreference};
pub use sink::{ConsoleSink, PresentationSink, Status};
pub use store::{PreferenceStore, StorageError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AeroPulseError>;
