//! Air-quality snapshot model

use serde::Serialize;

use super::wire;
use crate::classify::{self, AqiBand};

/// Current air-quality readings plus the derived European AQI band.
///
/// The whole snapshot is absent when the air-quality service is degraded;
/// individual readings are absent when the payload omits them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualitySnapshot {
    pub european_aqi: Option<f64>,
    pub us_aqi: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub ozone: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub band: AqiBand,
}

impl AirQualitySnapshot {
    #[must_use]
    pub fn from_wire(block: wire::AirCurrentBlock) -> Self {
        let finite = |value: Option<f64>| value.filter(|v| v.is_finite());
        let european_aqi = finite(block.european_aqi);
        Self {
            band: classify::aqi_band(european_aqi.unwrap_or(f64::NAN)),
            european_aqi,
            us_aqi: finite(block.us_aqi),
            pm2_5: finite(block.pm2_5),
            pm10: finite(block.pm10),
            ozone: finite(block.ozone),
            carbon_monoxide: finite(block.carbon_monoxide),
            nitrogen_dioxide: finite(block.nitrogen_dioxide),
        }
    }
}
