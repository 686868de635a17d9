//! Configuration management for the travel assistant
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AssistantError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the travel assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Directions API configuration
    #[serde(default)]
    pub directions: DirectionsConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenAI-compatible chat completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature, provider default when unset
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Directions API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_directions_base_url")]
    pub base_url: String,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// HTTP client settings shared by all providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures; 0 means a single attempt
    #[serde(default)]
    pub max_retries: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_directions_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_http_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: None,
        }
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_directions_base_url(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Conventional credential variables, consulted when no key is configured
const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
const GOOGLE_MAPS_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
const OPENWEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";

impl AssistantConfig {
    /// Load configuration from the given file, or the default locations
    /// when no path is given, layered under environment variables.
    ///
    /// An explicitly given path must exist.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(AssistantError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )))
                    .with_context(|| "Failed to load configuration");
                }
                path
            }
            None => Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml")),
        };

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVEL_ASSISTANT_LLM__API_KEY -> llm.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_ASSISTANT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AssistantConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.apply_env_credentials(|name| std::env::var(name).ok().filter(|v| !v.is_empty()));
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-assistant").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.directions.base_url.is_empty() {
            self.directions.base_url = default_directions_base_url();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Fill unset API keys from the conventional provider variables
    pub fn apply_env_credentials<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup(OPENAI_KEY_VAR);
        }
        if self.directions.api_key.is_none() {
            self.directions.api_key = lookup(GOOGLE_MAPS_KEY_VAR);
        }
        if self.weather.api_key.is_none() {
            self.weather.api_key = lookup(OPENWEATHER_KEY_VAR);
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Provided keys must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("llm.api_key", &self.llm.api_key),
            ("directions.api_key", &self.directions.api_key),
            ("weather.api_key", &self.weather.api_key),
        ];
        for (name, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(AssistantError::config(format!(
                        "{name} cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Every provider needs a key before the assistant can run
    pub fn require_credentials(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("llm.api_key", OPENAI_KEY_VAR, &self.llm.api_key),
            ("directions.api_key", GOOGLE_MAPS_KEY_VAR, &self.directions.api_key),
            ("weather.api_key", OPENWEATHER_KEY_VAR, &self.weather.api_key),
        ]
        .into_iter()
        .filter(|(_, _, key)| key.is_none())
        .map(|(name, _, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AssistantError::config(format!(
                "Missing API keys: {}. Set them in the config file or via {}, {}, {}",
                missing.join(", "),
                OPENAI_KEY_VAR,
                GOOGLE_MAPS_KEY_VAR,
                OPENWEATHER_KEY_VAR
            ))
            .into())
        }
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(
                AssistantError::config("HTTP timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.http.max_retries > 10 {
            return Err(AssistantError::config("HTTP max retries cannot exceed 10").into());
        }

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(
                    AssistantError::config("LLM temperature must be between 0.0 and 2.0").into(),
                );
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AssistantError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AssistantError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let base_urls = [
            ("llm", &self.llm.base_url),
            ("directions", &self.directions.base_url),
            ("weather", &self.weather.base_url),
        ];
        for (name, url) in base_urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AssistantError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
