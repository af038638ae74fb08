//! Pure classification of raw weather numerics into display categories.
//!
//! Every function here is total: out-of-range and non-finite inputs map to a
//! defined fallback instead of panicking or returning an error. The lookup
//! tables are static data built once at compile time.

use serde::Serialize;

use crate::models::UnitPreference;

/// Coarse visual category derived from a weather code, used to drive theming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Clear,
    Clouds,
    Rain,
    Snow,
    Storm,
}

/// Display triple for a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub label: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
}

/// Category pair for an European AQI reading. `tone` is `None` when the
/// reading is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AqiBand {
    pub label: &'static str,
    pub tone: Option<&'static str>,
}

const UNKNOWN_CODE: CodeInfo = CodeInfo {
    label: "Unknown",
    icon: "DATA",
    tone: Tone::Clouds,
};

/// WMO weather interpretation codes, see
/// <https://open-meteo.com/en/docs#weathervariables>.
static WEATHER_CODES: &[(u16, CodeInfo)] = &[
    (0, CodeInfo { label: "Clear sky", icon: "CLEAR", tone: Tone::Clear }),
    (1, CodeInfo { label: "Mainly clear", icon: "CLEAR", tone: Tone::Clear }),
    (2, CodeInfo { label: "Partly cloudy", icon: "CLOUD", tone: Tone::Clouds }),
    (3, CodeInfo { label: "Overcast", icon: "CLOUD", tone: Tone::Clouds }),
    (45, CodeInfo { label: "Fog", icon: "FOG", tone: Tone::Clouds }),
    (48, CodeInfo { label: "Freezing fog", icon: "FOG", tone: Tone::Clouds }),
    (51, CodeInfo { label: "Light drizzle", icon: "RAIN", tone: Tone::Rain }),
    (53, CodeInfo { label: "Drizzle", icon: "RAIN", tone: Tone::Rain }),
    (55, CodeInfo { label: "Dense drizzle", icon: "RAIN", tone: Tone::Rain }),
    (56, CodeInfo { label: "Freezing drizzle", icon: "RAIN", tone: Tone::Rain }),
    (57, CodeInfo { label: "Dense freezing drizzle", icon: "RAIN", tone: Tone::Rain }),
    (61, CodeInfo { label: "Slight rain", icon: "RAIN", tone: Tone::Rain }),
    (63, CodeInfo { label: "Rain", icon: "RAIN", tone: Tone::Rain }),
    (65, CodeInfo { label: "Heavy rain", icon: "RAIN", tone: Tone::Rain }),
    (66, CodeInfo { label: "Freezing rain", icon: "RAIN", tone: Tone::Rain }),
    (67, CodeInfo { label: "Heavy freezing rain", icon: "RAIN", tone: Tone::Rain }),
    (71, CodeInfo { label: "Slight snow", icon: "SNOW", tone: Tone::Snow }),
    (73, CodeInfo { label: "Snow", icon: "SNOW", tone: Tone::Snow }),
    (75, CodeInfo { label: "Heavy snow", icon: "SNOW", tone: Tone::Snow }),
    (77, CodeInfo { label: "Snow grains", icon: "SNOW", tone: Tone::Snow }),
    (80, CodeInfo { label: "Rain showers", icon: "RAIN", tone: Tone::Rain }),
    (81, CodeInfo { label: "Rain showers", icon: "RAIN", tone: Tone::Rain }),
    (82, CodeInfo { label: "Violent showers", icon: "RAIN", tone: Tone::Storm }),
    (85, CodeInfo { label: "Snow showers", icon: "SNOW", tone: Tone::Snow }),
    (86, CodeInfo { label: "Heavy snow showers", icon: "SNOW", tone: Tone::Snow }),
    (95, CodeInfo { label: "Thunderstorm", icon: "STORM", tone: Tone::Storm }),
    (96, CodeInfo { label: "Thunderstorm and hail", icon: "STORM", tone: Tone::Storm }),
    (99, CodeInfo { label: "Severe thunderstorm", icon: "STORM", tone: Tone::Storm }),
];

/// 16-point compass rose, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Classify a WMO weather code into its display triple.
///
/// Codes outside the table, fractional codes, and non-finite inputs all yield
/// the Unknown entry.
#[must_use]
pub fn weather_code_info(code: f64) -> CodeInfo {
    if !code.is_finite() || code.fract() != 0.0 || !(0.0..=u16::MAX as f64).contains(&code) {
        return UNKNOWN_CODE;
    }
    let code = code as u16;
    WEATHER_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, info)| *info)
        .unwrap_or(UNKNOWN_CODE)
}

/// Describe a wind speed in km/h with one of five ordered bands.
#[must_use]
pub fn describe_wind(speed_kmh: f64) -> &'static str {
    if !speed_kmh.is_finite() {
        return "Unknown";
    }
    if speed_kmh < 5.0 {
        "Calm flow"
    } else if speed_kmh < 15.0 {
        "Light breeze"
    } else if speed_kmh < 30.0 {
        "Steady wind"
    } else if speed_kmh < 50.0 {
        "Strong wind"
    } else {
        "Severe wind"
    }
}

/// Convert a bearing in degrees into its 16-point compass label.
///
/// The bearing is normalized into `[0, 360)`, then snapped to the nearest
/// 22.5-degree sector.
#[must_use]
pub fn compass_point(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return "--";
    }
    let normalized = ((degrees % 360.0) + 360.0) % 360.0;
    let index = (normalized / 22.5).round() as usize % 16;
    COMPASS_POINTS[index]
}

/// Classify an European AQI reading into its category band.
///
/// The bands use inclusive upper bounds; anything above 100 is Severe.
#[must_use]
pub fn aqi_band(value: f64) -> AqiBand {
    if !value.is_finite() {
        return AqiBand {
            label: "Unavailable",
            tone: None,
        };
    }
    let (label, tone) = if value <= 20.0 {
        ("Good", "good")
    } else if value <= 40.0 {
        ("Fair", "moderate")
    } else if value <= 60.0 {
        ("Moderate", "moderate")
    } else if value <= 80.0 {
        ("Poor", "poor")
    } else if value <= 100.0 {
        ("Very poor", "very-poor")
    } else {
        ("Severe", "severe")
    };
    AqiBand {
        label,
        tone: Some(tone),
    }
}

/// Convert a stored Celsius value for display in the given unit.
///
/// Values are stored and fetched in Celsius only; Fahrenheit exists purely at
/// presentation time. Non-finite input yields `None` rather than a bogus zero.
#[must_use]
pub fn display_temperature(celsius: f64, unit: UnitPreference) -> Option<f64> {
    if !celsius.is_finite() {
        return None;
    }
    Some(match unit {
        UnitPreference::Celsius => celsius,
        UnitPreference::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    })
}
