//! Error types and handling for the AeroPulse application

use thiserror::Error;

use crate::geolocate::GeolocationError;
use crate::store::StorageError;

/// Remote service a network failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Forecast,
    AirQuality,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Geocoding => write!(f, "geocoding"),
            Service::Forecast => write!(f, "forecast"),
            Service::AirQuality => write!(f, "air quality"),
        }
    }
}

/// Main error type for the AeroPulse application
#[derive(Error, Debug)]
pub enum AeroPulseError {
    /// A place name resolved to no match
    #[error("no match for \"{query}\"")]
    Lookup { query: String },

    /// Non-success HTTP status from a remote service
    #[error("{service} request failed with status {status}")]
    Network { service: Service, status: u16 },

    /// Forecast response without the required current-conditions block
    #[error("forecast payload is missing the current conditions block")]
    IncompletePayload,

    /// Device location unavailable, denied, or timed out
    #[error("geolocation failed: {source}")]
    Geolocation {
        #[from]
        source: GeolocationError,
    },

    /// Preference storage errors
    #[error("storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },

    /// Configuration-related errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Transport-level HTTP errors (connect, timeout, body decode)
    #[error("transport error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

impl AeroPulseError {
    /// Create a new lookup error
    pub fn lookup<S: Into<String>>(query: S) -> Self {
        Self::Lookup {
            query: query.into(),
        }
    }

    /// Create a new network error for a remote service
    pub fn network(service: Service, status: u16) -> Self {
        Self::Network { service, status }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the single user-facing message for this error.
    ///
    /// Exactly one status line reflects the outcome of a refresh cycle, so
    /// every variant maps to one short sentence.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AeroPulseError::Lookup { .. } => "City not found.".to_string(),
            AeroPulseError::Network { service, .. } => match service {
                Service::Geocoding => "City lookup failed.".to_string(),
                Service::Forecast => "Weather request failed.".to_string(),
                Service::AirQuality => "Air quality request failed.".to_string(),
            },
            AeroPulseError::IncompletePayload => "Incomplete weather payload.".to_string(),
            AeroPulseError::Geolocation { .. } => "Could not access your location.".to_string(),
            AeroPulseError::Storage { .. } => "Saved settings could not be read.".to_string(),
            AeroPulseError::Config { message } => format!("Configuration error: {message}"),
            AeroPulseError::Http { .. } => "Unable to load weather.".to_string(),
        }
    }
}
