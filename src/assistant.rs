//! The travel assistant: plan processing and follow-up questions

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::config::AssistantConfig;
use crate::extraction::IntentExtractor;
use crate::http::build_client;
use crate::llm::{LanguageModel, OpenAiClient};
use crate::models::TravelState;
use crate::routing::{DirectionsProvider, GoogleDirectionsClient, detail_traffic, resolve_route};
use crate::weather::{OpenWeatherClient, WeatherProvider, fetch_weather};
use crate::{AssistantError, Result};

fn query_prompt(travel_data: &str, query: &str) -> String {
    format!(
        "Use the travel data below to answer the user's question concisely.

Travel Data:
{travel_data}

User Query: {query}"
    )
}

/// Answer a question against a snapshot.
///
/// Without a snapshot that holds a route the model is never called.
#[instrument(skip_all)]
pub async fn answer_query(
    model: &dyn LanguageModel,
    state: Option<&TravelState>,
    query: &str,
) -> Result<String> {
    let state = state
        .filter(|s| s.has_route())
        .ok_or(AssistantError::NoTravelPlan)?;

    let travel_data = state
        .to_prompt_json()
        .map_err(|e| AssistantError::query(e.to_string()))?;

    let reply = model
        .complete(&query_prompt(&travel_data, query))
        .await
        .map_err(|e| AssistantError::query(e.to_string()))?;

    Ok(reply.trim().to_string())
}

/// Conversational travel assistant.
///
/// Owns the providers and the latest [`TravelState`] snapshot.
pub struct TravelAssistant {
    model: Arc<dyn LanguageModel>,
    extractor: IntentExtractor,
    directions: Arc<dyn DirectionsProvider>,
    weather: Arc<dyn WeatherProvider>,
    state: Option<Arc<TravelState>>,
    next_version: u64,
}

impl TravelAssistant {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        directions: Arc<dyn DirectionsProvider>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            extractor: IntentExtractor::new(model.clone()),
            model,
            directions,
            weather,
            state: None,
            next_version: 1,
        }
    }

    /// Wire up the HTTP-backed providers. All API keys must be present.
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        config.require_credentials()?;
        let client = build_client(&config.http).context("Failed to set up provider clients")?;

        Ok(Self::new(
            Arc::new(OpenAiClient::new(client.clone(), &config.llm)),
            Arc::new(GoogleDirectionsClient::new(client.clone(), &config.directions)),
            Arc::new(OpenWeatherClient::new(client, &config.weather)),
        ))
    }

    /// Latest snapshot, if a plan has been processed
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<TravelState>> {
        self.state.clone()
    }

    /// Extract, route, fetch weather and traffic, then publish a new snapshot.
    ///
    /// Extraction and routing failures leave the previous snapshot in place.
    /// Weather and traffic failures are recorded inside the new snapshot.
    #[instrument(skip(self, user_input))]
    pub async fn process_travel_plan(&mut self, user_input: &str) -> Result<Arc<TravelState>> {
        let request = self.extractor.extract(user_input).await?;

        let route_details = resolve_route(self.directions.as_ref(), &request).await?;

        let weather_forecast = fetch_weather(self.weather.as_ref(), &request.locations()).await;
        let traffic_conditions =
            detail_traffic(self.directions.as_ref(), &request.origin, &request.destination).await;

        let state = Arc::new(TravelState::new(
            self.next_version,
            route_details,
            weather_forecast,
            traffic_conditions,
        ));
        self.next_version += 1;
        self.state = Some(state.clone());

        info!(version = state.version, legs = state.route_details.len(), "travel plan processed");
        Ok(state)
    }

    /// Answer a follow-up question about the current plan
    pub async fn answer_query(&self, query: &str) -> Result<String> {
        answer_query(self.model.as_ref(), self.state.as_deref(), query).await
    }

    /// Like [`TravelAssistant::answer_query`], with failures rendered as text
    pub async fn process_query(&self, query: &str) -> String {
        match self.answer_query(query).await {
            Ok(answer) => answer,
            Err(e) => {
                if !matches!(e, AssistantError::NoTravelPlan) {
                    warn!(error = %e, "query failed");
                }
                e.to_string()
            }
        }
    }
}
