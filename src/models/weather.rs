//! Display-ready weather snapshot, assembled from a raw forecast payload.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::air::AirQualitySnapshot;
use super::location::Coordinates;
use super::wire;
use crate::align;
use crate::classify::{self, CodeInfo};
use crate::error::AeroPulseError;

/// Classified current conditions.
///
/// Raw numerics stay optional; a reading the payload omitted (or reported as
/// non-finite) renders as a placeholder downstream. Values are Celsius, km/h,
/// hPa, meters, and millimeters as fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    /// Observation timestamp as reported (location-local wall clock)
    pub observed_at: Option<String>,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub visibility_m: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_gust_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub is_day: Option<bool>,
    pub weather: CodeInfo,
    pub wind_descriptor: &'static str,
    pub compass: &'static str,
}

/// One entry of the hourly display window. The first slot carries the
/// distinguished "Now" label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySlot {
    pub time_label: String,
    pub temperature: f64,
    pub condition: &'static str,
    pub wind_speed_kmh: f64,
    pub rain_chance_pct: f64,
}

/// One entry of the daily display window. Index 0 carries "Today".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySlot {
    pub day_label: String,
    pub weather: CodeInfo,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub wind_peak_kmh: f64,
    pub rain_risk_pct: f64,
}

/// Classified weather view for one location at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub timezone_tag: String,
    pub current: CurrentConditions,
    /// Aligned to "now", clipped to the hourly window; empty when the payload
    /// carried no hourly series.
    pub hourly: Vec<HourlySlot>,
    /// Clipped to the daily window; empty when the payload carried no daily
    /// series.
    pub daily: Vec<DailySlot>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub uv_index_max: Option<f64>,
}

/// The combined weather + air-quality view-model handed to the presentation
/// sink. Built fresh each refresh cycle, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub location_label: String,
    pub coordinates: Coordinates,
    pub weather: WeatherSnapshot,
    pub air_quality: Option<AirQualitySnapshot>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Assemble the display snapshot from raw payloads.
    ///
    /// Fails only when the forecast is missing its current block; a missing
    /// air-quality payload yields an absent air-quality section.
    pub fn assemble(
        coordinates: Coordinates,
        location_label: String,
        forecast: wire::ForecastResponse,
        air: Option<wire::AirQualityResponse>,
        now: NaiveDateTime,
        hourly_window: usize,
        daily_window: usize,
    ) -> Result<Self, AeroPulseError> {
        let current_block = forecast.current.ok_or(AeroPulseError::IncompletePayload)?;
        let timezone_tag = align::timezone_tag(
            forecast.timezone_abbreviation.as_deref(),
            forecast.timezone.as_deref(),
        );

        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        let wind_speed = finite(current_block.wind_speed_10m);
        let wind_direction = finite(current_block.wind_direction_10m);

        let current = CurrentConditions {
            weather: classify::weather_code_info(
                current_block.weather_code.unwrap_or(f64::NAN),
            ),
            wind_descriptor: classify::describe_wind(wind_speed.unwrap_or(f64::NAN)),
            compass: classify::compass_point(wind_direction.unwrap_or(f64::NAN)),
            observed_at: current_block.time,
            temperature: finite(current_block.temperature_2m),
            apparent_temperature: finite(current_block.apparent_temperature),
            humidity: finite(current_block.relative_humidity_2m),
            pressure: finite(current_block.surface_pressure),
            visibility_m: finite(current_block.visibility),
            precipitation_mm: finite(current_block.precipitation),
            cloud_cover: finite(current_block.cloud_cover),
            wind_speed_kmh: wind_speed,
            wind_gust_kmh: finite(current_block.wind_gusts_10m),
            wind_direction_deg: wind_direction,
            is_day: current_block.is_day.map(|flag| flag == 1),
        };

        let hourly = forecast
            .hourly
            .map(|block| build_hourly(&block, current.observed_at.as_deref(), now, hourly_window))
            .unwrap_or_default();

        let (daily, sunrise, sunset, uv_index_max) = match forecast.daily {
            Some(block) => build_daily(&block, daily_window),
            None => (Vec::new(), None, None, None),
        };

        let air_quality = air
            .and_then(|payload| payload.current)
            .map(AirQualitySnapshot::from_wire);

        Ok(Self {
            location_label,
            coordinates,
            weather: WeatherSnapshot {
                timezone_tag,
                current,
                hourly,
                daily,
                sunrise,
                sunset,
                uv_index_max,
            },
            air_quality,
            fetched_at: Utc::now(),
        })
    }
}

/// Read one value out of a parallel series, coercing absent or non-finite
/// entries to 0 for display.
fn series_value(series: &Option<Vec<Option<f64>>>, index: usize) -> f64 {
    series
        .as_ref()
        .and_then(|values| values.get(index))
        .copied()
        .flatten()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Read a weather code out of a parallel series; absent entries classify as
/// Unknown rather than clear sky.
fn series_code(series: &Option<Vec<Option<f64>>>, index: usize) -> f64 {
    series
        .as_ref()
        .and_then(|values| values.get(index))
        .copied()
        .flatten()
        .unwrap_or(f64::NAN)
}

fn build_hourly(
    block: &wire::HourlyBlock,
    current_time: Option<&str>,
    now: NaiveDateTime,
    window: usize,
) -> Vec<HourlySlot> {
    let start = align::pick_hourly_start(&block.time, current_time, now);
    let end = (start + window).min(block.time.len());
    (start..end)
        .map(|i| HourlySlot {
            time_label: align::format_hour_label(&block.time[i], i == start),
            temperature: series_value(&block.temperature_2m, i),
            condition: classify::weather_code_info(series_code(&block.weather_code, i)).label,
            wind_speed_kmh: series_value(&block.wind_speed_10m, i),
            rain_chance_pct: series_value(&block.precipitation_probability, i),
        })
        .collect()
}

fn build_daily(
    block: &wire::DailyBlock,
    window: usize,
) -> (Vec<DailySlot>, Option<String>, Option<String>, Option<f64>) {
    let count = window.min(block.time.len());
    let slots = (0..count)
        .map(|i| DailySlot {
            day_label: align::format_day_label(&block.time[i], i),
            weather: classify::weather_code_info(series_code(&block.weather_code, i)),
            temperature_min: series_value(&block.temperature_2m_min, i),
            temperature_max: series_value(&block.temperature_2m_max, i),
            wind_peak_kmh: series_value(&block.wind_speed_10m_max, i),
            rain_risk_pct: series_value(&block.precipitation_probability_max, i),
        })
        .collect();

    let first_clock = |series: &Option<Vec<String>>| {
        series
            .as_ref()
            .and_then(|values| values.first())
            .map(|t| align::format_clock(t))
    };
    let sunrise = first_clock(&block.sunrise);
    let sunset = first_clock(&block.sunset);
    let uv_index_max = block
        .uv_index_max
        .as_ref()
        .and_then(|values| values.first())
        .copied()
        .flatten()
        .filter(|v| v.is_finite());

    (slots, sunrise, sunset, uv_index_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> Coordinates {
        Coordinates::new(26.8024, 84.503)
    }

    fn now() -> NaiveDateTime {
        align::parse_iso_minutes("2026-08-06T14:30").unwrap()
    }

    fn sample_forecast() -> wire::ForecastResponse {
        wire::ForecastResponse {
            current: Some(wire::CurrentBlock {
                time: Some("2026-08-06T14:30".to_string()),
                temperature_2m: Some(31.4),
                relative_humidity_2m: Some(58.0),
                apparent_temperature: Some(34.0),
                is_day: Some(1),
                precipitation: Some(0.2),
                weather_code: Some(3.0),
                surface_pressure: Some(1006.0),
                wind_speed_10m: Some(12.2),
                wind_direction_10m: Some(200.0),
                wind_gusts_10m: Some(22.0),
                cloud_cover: Some(85.0),
                visibility: Some(18000.0),
            }),
            hourly: Some(wire::HourlyBlock {
                time: (0..24)
                    .map(|h| format!("2026-08-06T{h:02}:00"))
                    .collect(),
                temperature_2m: Some((0..24).map(|h| Some(22.0 + h as f64 * 0.5)).collect()),
                precipitation_probability: Some((0..24).map(|_| Some(10.0)).collect()),
                wind_speed_10m: Some((0..24).map(|_| Some(8.0)).collect()),
                weather_code: Some((0..24).map(|_| Some(2.0)).collect()),
            }),
            daily: Some(wire::DailyBlock {
                time: (6..20).map(|d| format!("2026-08-{d:02}")).collect(),
                weather_code: Some((0..14).map(|_| Some(61.0)).collect()),
                temperature_2m_max: Some((0..14).map(|_| Some(33.0)).collect()),
                temperature_2m_min: Some((0..14).map(|_| Some(24.0)).collect()),
                precipitation_probability_max: Some((0..14).map(|_| Some(55.0)).collect()),
                wind_speed_10m_max: Some((0..14).map(|_| Some(19.0)).collect()),
                uv_index_max: Some((0..14).map(|_| Some(7.5)).collect()),
                sunrise: Some((6..20).map(|d| format!("2026-08-{d:02}T05:31")).collect()),
                sunset: Some((6..20).map(|d| format!("2026-08-{d:02}T18:46")).collect()),
            }),
            timezone: Some("Asia/Kolkata".to_string()),
            timezone_abbreviation: Some("IST".to_string()),
        }
    }

    #[test]
    fn missing_current_block_is_incomplete_payload() {
        let forecast = wire::ForecastResponse::default();
        let result = Snapshot::assemble(coords(), "X".into(), forecast, None, now(), 12, 14);
        assert!(matches!(result, Err(AeroPulseError::IncompletePayload)));
    }

    #[test]
    fn assembles_classified_current_conditions() {
        let snapshot =
            Snapshot::assemble(coords(), "Bettiah, Bihar, India".into(), sample_forecast(), None, now(), 12, 14)
                .unwrap();
        let current = &snapshot.weather.current;
        assert_eq!(current.weather.label, "Overcast");
        assert_eq!(current.wind_descriptor, "Light breeze");
        assert_eq!(current.compass, "SSW");
        assert_eq!(current.temperature, Some(31.4));
        assert_eq!(current.is_day, Some(true));
        assert_eq!(snapshot.weather.timezone_tag, "IST");
        assert_eq!(snapshot.location_label, "Bettiah, Bihar, India");
        assert!(snapshot.air_quality.is_none());
    }

    #[test]
    fn hourly_window_starts_at_now_with_now_label() {
        let snapshot =
            Snapshot::assemble(coords(), "X".into(), sample_forecast(), None, now(), 12, 14)
                .unwrap();
        let hourly = &snapshot.weather.hourly;
        // Exact match on the observation time would need 14:30 in the series;
        // the first slot at or after 14:30 is 15:00.
        assert_eq!(hourly.len(), 9);
        assert_eq!(hourly[0].time_label, "Now");
        assert_eq!(hourly[1].time_label, "4pm");
        assert_eq!(hourly[0].temperature, 22.0 + 15.0 * 0.5);
    }

    #[test]
    fn daily_window_caps_at_fourteen_with_today_label() {
        let snapshot =
            Snapshot::assemble(coords(), "X".into(), sample_forecast(), None, now(), 12, 14)
                .unwrap();
        let daily = &snapshot.weather.daily;
        assert_eq!(daily.len(), 14);
        assert_eq!(daily[0].day_label, "Today");
        assert_eq!(daily[1].day_label, "Fri, Aug 7");
        assert_eq!(daily[0].weather.label, "Slight rain");
        assert_eq!(snapshot.weather.sunrise.as_deref(), Some("5:31 AM"));
        assert_eq!(snapshot.weather.sunset.as_deref(), Some("6:46 PM"));
        assert_eq!(snapshot.weather.uv_index_max, Some(7.5));
    }

    #[test]
    fn missing_series_disable_their_views() {
        let mut forecast = sample_forecast();
        forecast.hourly = None;
        forecast.daily = None;
        let snapshot =
            Snapshot::assemble(coords(), "X".into(), forecast, None, now(), 12, 14).unwrap();
        assert!(snapshot.weather.hourly.is_empty());
        assert!(snapshot.weather.daily.is_empty());
        assert!(snapshot.weather.sunrise.is_none());
        assert!(snapshot.weather.uv_index_max.is_none());
    }

    #[test]
    fn absent_hourly_numerics_render_as_zero_but_codes_as_unknown() {
        let mut forecast = sample_forecast();
        if let Some(hourly) = forecast.hourly.as_mut() {
            hourly.temperature_2m = None;
            hourly.weather_code = None;
        }
        let snapshot =
            Snapshot::assemble(coords(), "X".into(), forecast, None, now(), 12, 14).unwrap();
        let slot = &snapshot.weather.hourly[0];
        assert_eq!(slot.temperature, 0.0);
        assert_eq!(slot.condition, "Unknown");
    }

    #[test]
    fn air_quality_payload_attaches_when_present() {
        let air = wire::AirQualityResponse {
            current: Some(wire::AirCurrentBlock {
                european_aqi: Some(72.0),
                ..Default::default()
            }),
        };
        let snapshot = Snapshot::assemble(
            coords(),
            "X".into(),
            sample_forecast(),
            Some(air),
            now(),
            12,
            14,
        )
        .unwrap();
        let air_quality = snapshot.air_quality.unwrap();
        assert_eq!(air_quality.band.label, "Poor");
    }

    #[test]
    fn air_quality_without_current_block_is_absent() {
        let snapshot = Snapshot::assemble(
            coords(),
            "X".into(),
            sample_forecast(),
            Some(wire::AirQualityResponse { current: None }),
            now(),
            12,
            14,
        )
        .unwrap();
        assert!(snapshot.air_quality.is_none());
    }
}
