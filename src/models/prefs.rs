//! User preferences that persist across refresh cycles

use serde::{Deserialize, Serialize};

use super::location::normalize_city_text;

/// Temperature unit preference. Applied only at presentation time; every
/// stored and fetched value stays in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Most-recently-used list of searched city names.
///
/// Entries are normalized, de-duplicated case-insensitively (the most recent
/// casing wins), and capped at a fixed length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCities {
    cities: Vec<String>,
    limit: usize,
}

impl RecentCities {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            cities: Vec::new(),
            limit,
        }
    }

    /// Rebuild from persisted entries, re-normalizing and re-capping.
    #[must_use]
    pub fn from_stored(stored: Vec<String>, limit: usize) -> Self {
        let mut list = Self::new(limit);
        for city in stored.into_iter().rev() {
            list.push(&city);
        }
        list
    }

    /// Insert a city at the front, dropping any case-insensitive duplicate.
    /// Empty input after normalization is ignored.
    pub fn push(&mut self, city: &str) {
        let normalized = normalize_city_text(city);
        if normalized.is_empty() {
            return;
        }
        let lowered = normalized.to_lowercase();
        self.cities.retain(|stored| stored.to_lowercase() != lowered);
        self.cities.insert(0, normalized);
        self.cities.truncate(self.limit);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.cities
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mru_order() {
        let mut list = RecentCities::new(6);
        list.push("Paris");
        list.push("Tokyo");
        assert_eq!(list.as_slice(), ["Tokyo", "Paris"]);
    }

    #[test]
    fn test_case_insensitive_dedup_latest_casing_wins() {
        let mut list = RecentCities::new(6);
        list.push("Paris");
        list.push("paris");
        assert_eq!(list.as_slice(), ["paris"]);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut list = RecentCities::new(3);
        for city in ["A", "B", "C", "D"] {
            list.push(city);
        }
        assert_eq!(list.as_slice(), ["D", "C", "B"]);
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut list = RecentCities::new(3);
        list.push("   ");
        assert!(list.is_empty());
    }

    #[test]
    fn test_from_stored_preserves_order_and_cap() {
        let stored = vec![
            "Paris".to_string(),
            "  tokyo ".to_string(),
            "PARIS".to_string(),
            "Lima".to_string(),
        ];
        let list = RecentCities::from_stored(stored, 3);
        // The most recent casing of Paris survives the dedup.
        assert_eq!(list.as_slice(), ["Paris", "tokyo", "Lima"].map(String::from));
    }
}
