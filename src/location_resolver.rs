//! Location Resolution Module
//!
//! Resolves free-form city names to coordinates (forward geocoding) and
//! coordinates back to display labels (reverse geocoding).

use tracing::debug;

use crate::Result;
use crate::api::OpenMeteoApi;
use crate::error::AeroPulseError;
use crate::models::{Coordinates, ResolvedPlace};
use crate::models::wire::GeocodeRecord;

/// Placeholder label used when no component of a place name is known.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Service for resolving between place names and coordinates
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a city name to its best-matching place.
    ///
    /// No match is an error, not an empty result; a refresh cycle cannot
    /// proceed without coordinates.
    pub async fn forward(api: &dyn OpenMeteoApi, name: &str) -> Result<ResolvedPlace> {
        debug!("forward geocoding '{name}'");
        let record = api
            .search_place(name)
            .await?
            .ok_or_else(|| AeroPulseError::lookup(name))?;

        let city_name = record
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| name.to_string());

        Ok(ResolvedPlace {
            coordinates: Coordinates::new(record.latitude, record.longitude),
            label: compose_label(&record),
            city_name,
        })
    }

    /// Resolve coordinates to a display label.
    ///
    /// Any failure (network, non-success status, empty result set) yields
    /// `None`; callers substitute a placeholder instead of aborting.
    pub async fn reverse(api: &dyn OpenMeteoApi, coords: Coordinates) -> Option<String> {
        match api.reverse_place(coords).await {
            Ok(Some(record)) => Some(compose_label(&record)),
            Ok(None) => {
                debug!("no reverse geocoding result for {}", coords.format());
                None
            }
            Err(e) => {
                debug!("reverse geocoding failed for {}: {e}", coords.format());
                None
            }
        }
    }
}

/// Compose a display label from place, region, and country, dropping missing
/// components. All missing yields the fixed placeholder.
#[must_use]
pub fn compose_label(record: &GeocodeRecord) -> String {
    let components: Vec<&str> = [&record.name, &record.admin1, &record.country]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect();

    if components.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        components.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: Option<&str>, admin1: Option<&str>, country: Option<&str>) -> GeocodeRecord {
        GeocodeRecord {
            latitude: 26.8024,
            longitude: 84.503,
            name: name.map(String::from),
            admin1: admin1.map(String::from),
            country: country.map(String::from),
        }
    }

    #[test]
    fn label_joins_all_three_components() {
        let label = compose_label(&record(Some("Bettiah"), Some("Bihar"), Some("India")));
        assert_eq!(label, "Bettiah, Bihar, India");
    }

    #[test]
    fn label_drops_missing_components() {
        assert_eq!(
            compose_label(&record(Some("Bettiah"), None, Some("India"))),
            "Bettiah, India"
        );
        assert_eq!(compose_label(&record(None, None, Some("India"))), "India");
    }

    #[test]
    fn label_drops_empty_components() {
        assert_eq!(
            compose_label(&record(Some("Bettiah"), Some(""), Some("India"))),
            "Bettiah, India"
        );
    }

    #[test]
    fn all_missing_yields_placeholder() {
        assert_eq!(compose_label(&record(None, None, None)), UNKNOWN_LOCATION);
        assert_eq!(
            compose_label(&record(Some(""), Some(""), Some(""))),
            UNKNOWN_LOCATION
        );
    }
}
