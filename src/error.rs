//! Error types and handling for the travel assistant

use thiserror::Error;

/// Main error type for the travel assistant
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The model output could not be turned into a travel request
    #[error("Failed to parse travel information: {message}")]
    Extraction { message: String },

    /// The model output parsed but lacked required fields
    #[error("Incomplete travel information: missing {}", .missing.join(", "))]
    IncompleteExtraction { missing: Vec<String> },

    /// The directions provider returned no routes
    #[error("No route found")]
    RouteNotFound,

    /// The directions provider call failed
    #[error("Failed to fetch route: {message}")]
    Route { message: String },

    /// The traffic re-query failed
    #[error("Traffic fetch failed: {message}")]
    Traffic { message: String },

    /// A single location's weather lookup failed
    #[error("Weather fetch failed for {location}: {message}")]
    Weather { location: String, message: String },

    /// The model call behind a follow-up question failed
    #[error("Query processing failed: {message}")]
    Query { message: String },

    /// A question was asked before any plan was processed
    #[error("Please process a travel plan first using process_travel_plan().")]
    NoTravelPlan,
}

impl AssistantError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new extraction error
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn route<S: Into<String>>(message: S) -> Self {
        Self::Route {
            message: message.into(),
        }
    }

    pub fn traffic<S: Into<String>>(message: S) -> Self {
        Self::Traffic {
            message: message.into(),
        }
    }

    pub fn weather<L: Into<String>, S: Into<String>>(location: L, message: S) -> Self {
        Self::Weather {
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            AssistantError::Extraction { .. } => {
                "Could not understand the travel plan. Please rephrase it with an origin and a destination."
                    .to_string()
            }
            AssistantError::IncompleteExtraction { missing } => {
                format!("The travel plan is missing: {}", missing.join(", "))
            }
            AssistantError::RouteNotFound => {
                "No route could be found between those locations.".to_string()
            }
            AssistantError::Route { .. }
            | AssistantError::Traffic { .. }
            | AssistantError::Weather { .. }
            | AssistantError::Query { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            AssistantError::NoTravelPlan => self.to_string(),
        }
    }
}

/// Failure of a single call to an external provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Response(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for ProviderError {
    fn from(err: reqwest_middleware::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = AssistantError::config("missing API key");
        assert!(matches!(config_err, AssistantError::Config { .. }));

        let route_err = AssistantError::route("connection failed");
        assert!(matches!(route_err, AssistantError::Route { .. }));

        let weather_err = AssistantError::weather("Paris", "city not found");
        assert!(matches!(weather_err, AssistantError::Weather { .. }));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AssistantError::extraction("expected value").to_string(),
            "Failed to parse travel information: expected value"
        );
        assert_eq!(
            AssistantError::route("timeout").to_string(),
            "Failed to fetch route: timeout"
        );
        assert_eq!(
            AssistantError::traffic("denied").to_string(),
            "Traffic fetch failed: denied"
        );
        assert_eq!(AssistantError::RouteNotFound.to_string(), "No route found");

        let incomplete = AssistantError::IncompleteExtraction {
            missing: vec!["origin".to_string(), "destination".to_string()],
        };
        assert_eq!(
            incomplete.to_string(),
            "Incomplete travel information: missing origin, destination"
        );
    }

    #[test]
    fn test_user_messages() {
        let config_err = AssistantError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let route_err = AssistantError::route("test");
        assert!(route_err.user_message().contains("Unable to connect"));

        let incomplete = AssistantError::IncompleteExtraction {
            missing: vec!["origin".to_string()],
        };
        assert!(incomplete.user_message().contains("origin"));
    }

    #[test]
    fn test_plan_failure_user_messages() {
        assert_eq!(
            AssistantError::RouteNotFound.user_message(),
            "No route could be found between those locations."
        );
        assert!(
            AssistantError::extraction("expected value at line 1 column 1")
                .user_message()
                .contains("origin and a destination")
        );
        assert_eq!(
            AssistantError::NoTravelPlan.user_message(),
            "Please process a travel plan first using process_travel_plan()."
        );
    }

    #[test]
    fn test_provider_status_display() {
        let err = ProviderError::Status {
            status: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: city not found");
    }
}
