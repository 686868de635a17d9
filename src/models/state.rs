//! Travel state snapshot

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LegSummary, TrafficReport, WeatherReport};

/// Everything known about the current plan.
///
/// A snapshot is built once per processed plan and never mutated afterwards;
/// a new plan produces a new snapshot with a higher `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelState {
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub route_details: Vec<LegSummary>,
    /// Keyed by the location string exactly as extracted
    pub weather_forecast: BTreeMap<String, WeatherReport>,
    pub traffic_conditions: TrafficReport,
}

/// The parts of the snapshot the language model gets to see
#[derive(Serialize)]
struct PromptView<'a> {
    route_details: &'a [LegSummary],
    weather_forecast: &'a BTreeMap<String, WeatherReport>,
    traffic_conditions: &'a TrafficReport,
}

impl TravelState {
    #[must_use]
    pub fn new(
        version: u64,
        route_details: Vec<LegSummary>,
        weather_forecast: BTreeMap<String, WeatherReport>,
        traffic_conditions: TrafficReport,
    ) -> Self {
        Self {
            version,
            created_at: Utc::now(),
            route_details,
            weather_forecast,
            traffic_conditions,
        }
    }

    /// Whether there is a route to answer questions about
    #[must_use]
    pub fn has_route(&self) -> bool {
        !self.route_details.is_empty()
    }

    /// Pretty JSON of the route, weather and traffic data
    pub fn to_prompt_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&PromptView {
            route_details: &self.route_details,
            weather_forecast: &self.weather_forecast,
            traffic_conditions: &self.traffic_conditions,
        })
    }
}
