//! Current weather model

use serde::{Deserialize, Serialize};

/// Current conditions at a location, metric units
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherInfo {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Perceived temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

impl WeatherInfo {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C (feels like {:.1}°C)", self.temperature, self.feels_like)
    }
}

/// Weather for one location, or the reason it is missing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum WeatherReport {
    Available(WeatherInfo),
    Unavailable { error: String },
}

impl WeatherReport {
    #[must_use]
    pub fn unavailable<S: Into<String>>(error: S) -> Self {
        Self::Unavailable {
            error: error.into(),
        }
    }

    #[must_use]
    pub fn info(&self) -> Option<&WeatherInfo> {
        match self {
            Self::Available(info) => Some(info),
            Self::Unavailable { .. } => None,
        }
    }
}
