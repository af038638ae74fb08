//! Open-Meteo API client.
//!
//! One HTTP integration point for all four remote calls: forward/reverse
//! geocoding, the weather forecast, and the air-quality reading. The client
//! reports failures and leaves recovery policy (fallback labels, degraded
//! air quality, staleness) to its callers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::AeroPulseConfig;
use crate::error::{AeroPulseError, Service};
use crate::models::Coordinates;
use crate::models::wire;

const USER_AGENT: &str = "AeroPulse/0.1.0";

/// Comma lists of the named fields each endpoint is asked for.
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,\
                              precipitation,weather_code,surface_pressure,wind_speed_10m,\
                              wind_direction_10m,wind_gusts_10m,cloud_cover,visibility";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
                            precipitation_probability_max,wind_speed_10m_max,uv_index_max,\
                            sunrise,sunset";
const AIR_FIELDS: &str = "european_aqi,us_aqi,pm10,pm2_5,ozone,carbon_monoxide,nitrogen_dioxide";

/// The four remote operations a refresh cycle can issue.
///
/// The coordinator and resolver depend on this trait rather than the concrete
/// client so cycles can be driven against scripted services in tests.
#[async_trait]
pub trait OpenMeteoApi: Send + Sync {
    /// Best match for a free-form place name, `None` when nothing matched.
    async fn search_place(&self, name: &str) -> Result<Option<wire::GeocodeRecord>>;

    /// Best place record for coordinates, `None` when nothing matched.
    async fn reverse_place(&self, coords: Coordinates) -> Result<Option<wire::GeocodeRecord>>;

    /// Current + hourly + daily forecast for coordinates.
    async fn forecast(&self, coords: Coordinates) -> Result<wire::ForecastResponse>;

    /// Current air-quality reading for coordinates.
    async fn air_quality(&self, coords: Coordinates) -> Result<wire::AirQualityResponse>;
}

/// Weather API client for the Open-Meteo services
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
    air_quality_url: String,
    forecast_days: usize,
}

impl OpenMeteoClient {
    /// Create a new API client from the application configuration
    pub fn new(config: &AeroPulseConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.weather.timeout_seconds.into());
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            geocoding_url: config.weather.geocoding_url.clone(),
            forecast_url: config.weather.forecast_url.clone(),
            air_quality_url: config.weather.air_quality_url.clone(),
            forecast_days: config.defaults.daily_window,
        })
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        )
    }

    fn reverse_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/reverse?latitude={}&longitude={}&count=1&language=en&format=json",
            self.geocoding_url, coords.latitude, coords.longitude
        )
    }

    fn forecast_query(&self, coords: Coordinates) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&hourly={}&daily={}&forecast_days={}&timezone=auto",
            self.forecast_url,
            coords.latitude,
            coords.longitude,
            CURRENT_FIELDS,
            HOURLY_FIELDS,
            DAILY_FIELDS,
            self.forecast_days
        )
    }

    fn air_quality_query(&self, coords: Coordinates) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone=auto",
            self.air_quality_url, coords.latitude, coords.longitude, AIR_FIELDS
        )
    }

    async fn fetch_json<T: DeserializeOwned>(&self, service: Service, url: &str) -> Result<T> {
        debug!("{service} request URL: {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{service} request failed with status {status}");
            return Err(AeroPulseError::network(service, status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl OpenMeteoApi for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search_place(&self, name: &str) -> Result<Option<wire::GeocodeRecord>> {
        let payload: wire::GeocodeResponse = self
            .fetch_json(Service::Geocoding, &self.search_url(name))
            .await?;
        let best = payload.results.and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.swap_remove(0))
            }
        });
        match &best {
            Some(record) => info!(
                "geocoded '{}' to ({:.4}, {:.4})",
                name, record.latitude, record.longitude
            ),
            None => info!("no geocoding match for '{name}'"),
        }
        Ok(best)
    }

    #[instrument(skip(self))]
    async fn reverse_place(&self, coords: Coordinates) -> Result<Option<wire::GeocodeRecord>> {
        let payload: wire::GeocodeResponse = self
            .fetch_json(Service::Geocoding, &self.reverse_url(coords))
            .await?;
        Ok(payload.results.and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.swap_remove(0))
            }
        }))
    }

    #[instrument(skip(self))]
    async fn forecast(&self, coords: Coordinates) -> Result<wire::ForecastResponse> {
        info!("fetching forecast for {}", coords.format());
        self.fetch_json(Service::Forecast, &self.forecast_query(coords))
            .await
    }

    #[instrument(skip(self))]
    async fn air_quality(&self, coords: Coordinates) -> Result<wire::AirQualityResponse> {
        info!("fetching air quality for {}", coords.format());
        self.fetch_json(Service::AirQuality, &self.air_quality_query(coords))
            .await
    }
}
