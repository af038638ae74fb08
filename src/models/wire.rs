//! Open-Meteo API response structures.
//!
//! Every numeric field is optional so partially degraded payloads still
//! deserialize; absence is decided per field at assembly time.

use serde::Deserialize;

/// Geocoding response (forward and reverse share the shape)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    pub results: Option<Vec<GeocodeRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    pub admin1: Option<String>,
    pub country: Option<String>,
}

/// Forecast response from the Open-Meteo forecast endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentBlock>,
    pub hourly: Option<HourlyBlock>,
    pub daily: Option<DailyBlock>,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
}

/// Current conditions block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub time: Option<String>,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub is_day: Option<u8>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_direction_10m: Option<f64>,
    pub wind_gusts_10m: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub visibility: Option<f64>,
}

/// Hourly series, positionally correlated with `time`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    pub temperature_2m: Option<Vec<Option<f64>>>,
    pub precipitation_probability: Option<Vec<Option<f64>>>,
    pub wind_speed_10m: Option<Vec<Option<f64>>>,
    pub weather_code: Option<Vec<Option<f64>>>,
}

/// Daily series, positionally correlated with `time`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    pub weather_code: Option<Vec<Option<f64>>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
    pub uv_index_max: Option<Vec<Option<f64>>>,
    pub sunrise: Option<Vec<String>>,
    pub sunset: Option<Vec<String>>,
}

/// Air-quality response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirQualityResponse {
    pub current: Option<AirCurrentBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirCurrentBlock {
    pub european_aqi: Option<f64>,
    pub us_aqi: Option<f64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub ozone: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_parses_with_partial_series() {
        let payload = r#"{
            "timezone": "Asia/Kolkata",
            "timezone_abbreviation": "IST",
            "current": {
                "time": "2026-08-06T14:30",
                "temperature_2m": 31.4,
                "weather_code": 3,
                "wind_speed_10m": 12.2
            },
            "hourly": {
                "time": ["2026-08-06T14:00", "2026-08-06T15:00"],
                "temperature_2m": [31.0, null]
            }
        }"#;

        let parsed: ForecastResponse = serde_json::from_str(payload).unwrap();
        let current = parsed.current.unwrap();
        assert_eq!(current.temperature_2m, Some(31.4));
        assert_eq!(current.weather_code, Some(3.0));
        assert!(current.relative_humidity_2m.is_none());

        let hourly = parsed.hourly.unwrap();
        assert_eq!(hourly.time.len(), 2);
        assert_eq!(hourly.temperature_2m.unwrap()[1], None);
        assert!(parsed.daily.is_none());
    }

    #[test]
    fn forecast_parses_without_current_block() {
        let parsed: ForecastResponse = serde_json::from_str(r#"{"timezone": "UTC"}"#).unwrap();
        assert!(parsed.current.is_none());
    }

    #[test]
    fn geocode_parses_empty_results() {
        let parsed: GeocodeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_none());

        let parsed: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(parsed.results.unwrap().len(), 0);
    }

    #[test]
    fn air_quality_parses_current_fields() {
        let payload = r#"{
            "current": {
                "european_aqi": 34.0,
                "us_aqi": 52.0,
                "pm2_5": 11.3,
                "pm10": 21.7,
                "ozone": 61.0,
                "carbon_monoxide": 233.0,
                "nitrogen_dioxide": 14.2
            }
        }"#;
        let parsed: AirQualityResponse = serde_json::from_str(payload).unwrap();
        let current = parsed.current.unwrap();
        assert_eq!(current.european_aqi, Some(34.0));
        assert_eq!(current.nitrogen_dioxide, Some(14.2));
    }
}
