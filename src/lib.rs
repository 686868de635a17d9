//! `travel-assistant` - conversational travel planning
//!
//! This library turns a free-text travel description into a route with
//! per-leg traffic and weather details, then answers follow-up questions
//! about that trip with a language model.

pub mod assistant;
pub mod config;
pub mod error;
pub mod extraction;
pub mod http;
pub mod llm;
pub mod logging;
pub mod models;
pub mod routing;
pub mod weather;

// Re-export core types for public API
pub use assistant::TravelAssistant;
pub use config::AssistantConfig;
pub use error::{AssistantError, ProviderError};
pub use extraction::IntentExtractor;
pub use llm::{LanguageModel, OpenAiClient};
pub use models::{TravelRequest, TravelState};
pub use routing::{DirectionsProvider, DirectionsQuery, GoogleDirectionsClient};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AssistantError>;
