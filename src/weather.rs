//! Current weather lookups via OpenWeatherMap

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::AssistantError;
use crate::config::WeatherConfig;
use crate::error::ProviderError;
use crate::models::{WeatherInfo, WeatherReport};

const DEFAULT_FAILURE_MESSAGE: &str = "Weather fetch failed";

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a free-text location name
    async fn current_weather(&self, location: &str) -> Result<WeatherInfo, ProviderError>;
}

/// Fetch weather for every location, one call each, in order.
///
/// Results are keyed by the location string as given; a repeated location
/// keeps the result of its last lookup. A failed lookup only affects its own key.
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    locations: &[String],
) -> BTreeMap<String, WeatherReport> {
    let mut forecast = BTreeMap::new();
    for location in locations {
        let report = match provider.current_weather(location).await {
            Ok(info) => WeatherReport::Available(info),
            Err(e) => {
                let message = match e {
                    ProviderError::Status { message, .. } | ProviderError::Response(message) => {
                        message
                    }
                    other => other.to_string(),
                };
                warn!(error = %AssistantError::weather(location.as_str(), message.as_str()), "weather lookup failed");
                WeatherReport::unavailable(message)
            }
        };
        forecast.insert(location.clone(), report);
    }
    info!(locations = locations.len(), keys = forecast.len(), "weather fetched");
    forecast
}

/// `OpenWeatherMap` API response structures
mod openweather {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub wind: WindData,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindData {
        pub speed: f64,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl From<openweather::CurrentResponse> for WeatherInfo {
    fn from(response: openweather::CurrentResponse) -> Self {
        Self {
            temperature: response.main.temp,
            feels_like: response.main.feels_like,
            humidity: response.main.humidity,
            description: response
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            wind_speed: response.wind.speed,
        }
    }
}

/// Turn a status code and body into weather or a provider error
fn parse_weather_response(status: u16, body: &str) -> Result<WeatherInfo, ProviderError> {
    if status != 200 {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        return Err(ProviderError::Status { status, message });
    }
    let response: openweather::CurrentResponse = serde_json::from_str(body)?;
    Ok(response.into())
}

/// Weather API client for OpenWeatherMap
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
        }
    }

    fn request_url(&self, location: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(location),
            urlencoding::encode(&self.api_key)
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(name = "current_weather", skip(self))]
    async fn current_weather(&self, location: &str) -> Result<WeatherInfo, ProviderError> {
        let response = self.client.get(self.request_url(location)).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        parse_weather_response(status, &text)
    }
}
