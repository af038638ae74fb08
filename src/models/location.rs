//! Location models: coordinates, resolved places, and the persisted last location

use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format coordinates for logs and fallback labels
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Result of forward-geocoding a city name
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub coordinates: Coordinates,
    /// Canonical city name reported by the geocoder (falls back to the query)
    pub city_name: String,
    /// Full display label ("place, region, country")
    pub label: String,
}

/// Last successfully displayed location, persisted across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

impl StoredLocation {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Normalize free-form city input: trim and collapse inner whitespace.
#[must_use]
pub fn normalize_city_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
