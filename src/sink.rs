//! Presentation boundary.
//!
//! The coordinator never renders anything itself; it hands completed
//! snapshots and status transitions to a `PresentationSink`. The crate ships
//! a console renderer; graphical frontends implement the same trait.

use crate::classify;
use crate::models::{Snapshot, UnitPreference};

/// Single status indicator reflecting the most recent non-stale cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading(String),
    Ready(String),
    Error(String),
}

/// Consumer of assembled snapshots. Implementations own all visual concerns.
pub trait PresentationSink: Send + Sync {
    /// Status indicator changed.
    fn status(&self, status: Status);

    /// A fresh snapshot committed, or the unit preference changed for the
    /// held one. Values inside the snapshot are Celsius; `unit` is applied
    /// at render time only.
    fn present(&self, snapshot: &Snapshot, unit: UnitPreference);

    /// The recent-city list changed.
    fn recent_cities(&self, cities: &[String]);
}

/// Terminal renderer used by the CLI binary.
pub struct ConsoleSink;

impl ConsoleSink {
    fn unit_suffix(unit: UnitPreference) -> &'static str {
        match unit {
            UnitPreference::Celsius => "deg C",
            UnitPreference::Fahrenheit => "deg F",
        }
    }

    fn temp_text(celsius: Option<f64>, unit: UnitPreference) -> String {
        celsius
            .and_then(|c| classify::display_temperature(c, unit))
            .map(|t| format!("{}", t.round()))
            .unwrap_or_else(|| "--".to_string())
    }

    fn value_text(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
        value.map(fmt).unwrap_or_else(|| "--".to_string())
    }
}

impl PresentationSink for ConsoleSink {
    fn status(&self, status: Status) {
        match status {
            Status::Loading(text) => println!("... {text}"),
            Status::Ready(text) => println!("=== {text}"),
            Status::Error(text) => eprintln!("!!! {text}"),
        }
    }

    fn present(&self, snapshot: &Snapshot, unit: UnitPreference) {
        let suffix = Self::unit_suffix(unit);
        let weather = &snapshot.weather;
        let current = &weather.current;

        println!();
        println!("{}", snapshot.location_label);
        println!(
            "{} | {} {}",
            current.weather.label,
            Self::temp_text(current.temperature, unit),
            suffix
        );
        println!(
            "Feels like {} {} | Humidity {} | Pressure {}",
            Self::temp_text(current.apparent_temperature, unit),
            suffix,
            Self::value_text(current.humidity, |v| format!("{}%", v.round())),
            Self::value_text(current.pressure, |v| format!("{} hPa", v.round())),
        );
        println!(
            "Wind: {} | {} {} | Gusts {}",
            current.wind_descriptor,
            Self::value_text(current.wind_speed_kmh, |v| format!("{v:.1} km/h")),
            current.compass,
            Self::value_text(current.wind_gust_kmh, |v| format!("{v:.1} km/h")),
        );
        println!(
            "Visibility {} | Precipitation {} | Cloud cover {} | UV {}",
            Self::value_text(current.visibility_m, |v| format!("{:.1} km", v / 1000.0)),
            Self::value_text(current.precipitation_mm, |v| format!("{v:.1} mm")),
            Self::value_text(current.cloud_cover, |v| format!("{}%", v.round())),
            Self::value_text(weather.uv_index_max, |v| format!("{v:.1}")),
        );
        if let (Some(sunrise), Some(sunset)) = (&weather.sunrise, &weather.sunset) {
            println!("Sunrise {sunrise} | Sunset {sunset}");
        }

        if !weather.hourly.is_empty() {
            println!();
            println!("Next hours:");
            for slot in &weather.hourly {
                println!(
                    "  {:>5}  {} {}  {}  wind {} km/h  rain {}%",
                    slot.time_label,
                    Self::temp_text(Some(slot.temperature), unit),
                    suffix,
                    slot.condition,
                    slot.wind_speed_kmh.round(),
                    slot.rain_chance_pct.round(),
                );
            }
        }

        if !weather.daily.is_empty() {
            println!();
            println!("Next days:");
            for slot in &weather.daily {
                println!(
                    "  {:<12}  {} / {} {}  {}  wind peak {} km/h  rain risk {}%",
                    slot.day_label,
                    Self::temp_text(Some(slot.temperature_max), unit),
                    Self::temp_text(Some(slot.temperature_min), unit),
                    suffix,
                    slot.weather.label,
                    slot.wind_peak_kmh.round(),
                    slot.rain_risk_pct.round(),
                );
            }
        }

        println!();
        match &snapshot.air_quality {
            Some(air) => {
                let badge = match air.european_aqi {
                    Some(value) => format!("AQI {} - {}", value.round(), air.band.label),
                    None => "AQI unavailable".to_string(),
                };
                println!("{badge}");
                println!(
                    "  EU {} | US {} | PM2.5 {} | PM10 {} | Ozone {} | CO {}",
                    Self::value_text(air.european_aqi, |v| format!("{}", v.round())),
                    Self::value_text(air.us_aqi, |v| format!("{}", v.round())),
                    Self::value_text(air.pm2_5, |v| format!("{v:.1} ug/m3")),
                    Self::value_text(air.pm10, |v| format!("{v:.1} ug/m3")),
                    Self::value_text(air.ozone, |v| format!("{v:.1} ug/m3")),
                    Self::value_text(air.carbon_monoxide, |v| format!("{v:.1} ug/m3")),
                );
            }
            None => println!("AQI unavailable"),
        }

        if let Some(observed) = &current.observed_at {
            println!(
                "Updated {} ({})",
                crate::align::format_date_time(observed),
                weather.timezone_tag
            );
        }
    }

    fn recent_cities(&self, cities: &[String]) {
        if !cities.is_empty() {
            println!("Recent: {}", cities.join(", "));
        }
    }
}
