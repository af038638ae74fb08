//! Configuration management for the AeroPulse application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::error::AeroPulseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the AeroPulse application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AeroPulseConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Preference storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the geocoding API (forward and reverse)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Forecast endpoint URL
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Air-quality endpoint URL
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Preference storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory; empty means the platform data directory
    #[serde(default)]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// City used when device location is unavailable
    #[serde(default = "default_city")]
    pub city: String,
    /// Hourly display window length
    #[serde(default = "default_hourly_window")]
    pub hourly_window: usize,
    /// Daily display window length (also the requested forecast days)
    #[serde(default = "default_daily_window")]
    pub daily_window: usize,
    /// Maximum recent-city entries
    #[serde(default = "default_recent_city_limit")]
    pub recent_city_limit: usize,
    /// Background refresh interval in minutes
    #[serde(default = "default_auto_refresh_minutes")]
    pub auto_refresh_minutes: u64,
    /// Device geolocation timeout in seconds
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_seconds: u64,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_city() -> String {
    "Bettiah".to_string()
}

fn default_hourly_window() -> usize {
    12
}

fn default_daily_window() -> usize {
    14
}

fn default_recent_city_limit() -> usize {
    6
}

fn default_auto_refresh_minutes() -> u64 {
    10
}

fn default_geolocation_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            hourly_window: default_hourly_window(),
            daily_window: default_daily_window(),
            recent_city_limit: default_recent_city_limit(),
            auto_refresh_minutes: default_auto_refresh_minutes(),
            geolocation_timeout_seconds: default_geolocation_timeout(),
        }
    }
}

impl AeroPulseConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with AEROPULSE_ prefix, e.g.
        // AEROPULSE_DEFAULTS__CITY=Paris
        builder = builder.add_source(
            Environment::with_prefix("AEROPULSE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: AeroPulseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aeropulse").join("config.toml"))
    }

    /// Resolve the preference-store directory, falling back to the platform
    /// data directory when unset.
    #[must_use]
    pub fn storage_path(&self) -> Option<PathBuf> {
        if self.storage.location.is_empty() {
            dirs::data_dir().map(|dir| dir.join("aeropulse").join("prefs"))
        } else {
            Some(PathBuf::from(&self.storage.location))
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_endpoints()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_endpoints(&self) -> Result<()> {
        for (name, url) in [
            ("geocoding_url", &self.weather.geocoding_url),
            ("forecast_url", &self.weather.forecast_url),
            ("air_quality_url", &self.weather.air_quality_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AeroPulseError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(
                AeroPulseError::config("Weather API timeout must be between 1 and 300 seconds")
                    .into(),
            );
        }

        if self.defaults.hourly_window == 0 || self.defaults.hourly_window > 48 {
            return Err(
                AeroPulseError::config("Hourly window must be between 1 and 48 entries").into(),
            );
        }

        // Open-Meteo serves at most 16 forecast days.
        if self.defaults.daily_window == 0 || self.defaults.daily_window > 16 {
            return Err(
                AeroPulseError::config("Daily window must be between 1 and 16 days").into(),
            );
        }

        if self.defaults.recent_city_limit == 0 || self.defaults.recent_city_limit > 50 {
            return Err(
                AeroPulseError::config("Recent city limit must be between 1 and 50").into(),
            );
        }

        if self.defaults.auto_refresh_minutes == 0 {
            return Err(
                AeroPulseError::config("Auto refresh interval cannot be zero").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AeroPulseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if self.defaults.city.trim().is_empty() {
            return Err(AeroPulseError::config("Default city cannot be empty").into());
        }

        Ok(())
    }
}
