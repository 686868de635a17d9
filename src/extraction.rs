//! Turning free-text travel descriptions into structured requests

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::llm::LanguageModel;
use crate::models::{DepartureTime, TravelRequest};
use crate::{AssistantError, Result};

const FENCE: &str = "```";

fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract travel information from the following text and return it in JSON format.
The response should contain:
- origin: The starting location
- destination: The final destination
- waypoints: List of locations to visit in between (can be empty)
- departure_time: The planned start time (if mentioned, otherwise assume 'now')

Only return the JSON object, no other text.

Text: {text}"
    )
}

/// Inner text of the first fenced code block, without its language tag.
/// Text without a complete fence pair is returned trimmed.
#[must_use]
pub fn unwrap_code_fence(text: &str) -> &str {
    let Some(open) = text.find(FENCE) else {
        return text.trim();
    };
    let after_open = &text[open + FENCE.len()..];
    let Some(close) = after_open.find(FENCE) else {
        return text.trim();
    };
    let inner = &after_open[..close];

    // ```json\n{...}
    if let Some((tag, rest)) = inner.split_once('\n') {
        if is_language_tag(tag.trim()) {
            return rest.trim();
        }
    }

    // ```json {...}
    let tag_len = inner.find(|c: char| !is_tag_char(c)).unwrap_or(0);
    let rest = &inner[tag_len..];
    if tag_len > 0 && rest.starts_with(|c: char| c.is_whitespace() || c == '{' || c == '[') {
        return rest.trim();
    }
    inner.trim()
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_language_tag(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.chars().all(is_tag_char)
}

#[derive(Debug, Deserialize)]
struct RawTravelRequest {
    origin: Option<String>,
    destination: Option<String>,
    waypoints: Option<Vec<String>>,
    departure_time: Option<String>,
}

/// Parse model output (already unwrapped) into a [`TravelRequest`]
pub fn parse_travel_request(text: &str) -> Result<TravelRequest> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| AssistantError::extraction(e.to_string()))?;
    if !value.is_object() {
        return Err(AssistantError::extraction("expected a JSON object"));
    }

    let raw: RawTravelRequest =
        serde_json::from_value(value).map_err(|e| AssistantError::extraction(e.to_string()))?;

    let origin = raw.origin.filter(|s| !s.trim().is_empty());
    let destination = raw.destination.filter(|s| !s.trim().is_empty());

    let mut missing = Vec::new();
    if origin.is_none() {
        missing.push("origin".to_string());
    }
    if destination.is_none() {
        missing.push("destination".to_string());
    }

    match (origin, destination) {
        (Some(origin), Some(destination)) => Ok(TravelRequest {
            origin,
            destination,
            waypoints: raw.waypoints.unwrap_or_default(),
            departure_time: raw
                .departure_time
                .as_deref()
                .map_or(DepartureTime::Now, DepartureTime::parse),
        }),
        _ => Err(AssistantError::IncompleteExtraction { missing }),
    }
}

/// Intent extraction backed by a language model
pub struct IntentExtractor {
    model: Arc<dyn LanguageModel>,
}

impl IntentExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    #[instrument(skip(self, text))]
    pub async fn extract(&self, text: &str) -> Result<TravelRequest> {
        let reply = self
            .model
            .complete(&extraction_prompt(text))
            .await
            .map_err(|e| AssistantError::extraction(e.to_string()))?;

        let json = unwrap_code_fence(&reply);
        debug!(json, "unwrapped extraction reply");

        match parse_travel_request(json) {
            Ok(request) => {
                info!(
                    origin = %request.origin,
                    destination = %request.destination,
                    waypoints = request.waypoints.len(),
                    "extracted travel request"
                );
                Ok(request)
            }
            Err(e) => {
                warn!(error = %e, "extraction failed");
                Err(e)
            }
        }
    }
}
