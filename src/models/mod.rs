//! Data models: locations, preferences, wire payloads, and snapshots

pub mod air;
pub mod location;
pub mod prefs;
pub mod weather;
pub mod wire;

pub use air::AirQualitySnapshot;
pub use location::{Coordinates, ResolvedPlace, StoredLocation, normalize_city_text};
pub use prefs::{RecentCities, UnitPreference};
pub use weather::{CurrentConditions, DailySlot, HourlySlot, Snapshot, WeatherSnapshot};
