//! Route resolution and traffic detail via a directions provider

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::DirectionsConfig;
use crate::error::ProviderError;
use crate::models::{
    DepartureTime, LegSummary, Route, TrafficReport, TrafficSegment, TravelRequest,
};
use crate::{AssistantError, Result};

/// How the provider should predict traffic-adjusted durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficModel {
    BestGuess,
}

impl TrafficModel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficModel::BestGuess => "best_guess",
        }
    }
}

/// Everything one directions call needs
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsQuery {
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<String>,
    pub departure: DepartureTime,
    pub traffic_model: Option<TrafficModel>,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Candidate routes, best first. An empty list means no route exists.
    async fn directions(&self, query: &DirectionsQuery) -> std::result::Result<Vec<Route>, ProviderError>;
}

/// Resolve the requested trip into per-leg summaries.
///
/// Only the first candidate route is used.
#[instrument(skip(provider, request), fields(origin = %request.origin, destination = %request.destination))]
pub async fn resolve_route(
    provider: &dyn DirectionsProvider,
    request: &TravelRequest,
) -> Result<Vec<LegSummary>> {
    let query = DirectionsQuery {
        origin: request.origin.clone(),
        destination: request.destination.clone(),
        waypoints: request.waypoints.clone(),
        departure: request.departure_time.clone(),
        traffic_model: None,
    };

    let routes = provider
        .directions(&query)
        .await
        .map_err(|e| AssistantError::route(e.to_string()))?;

    let Some(route) = routes.first() else {
        warn!("directions provider returned no routes");
        return Err(AssistantError::RouteNotFound);
    };

    let legs: Vec<LegSummary> = route.legs.iter().map(LegSummary::from_leg).collect();
    info!(legs = legs.len(), "resolved route");
    Ok(legs)
}

/// Traffic delays for the direct origin → destination trip, departing now.
///
/// Waypoints are not considered. Failures are reported inside the result.
#[instrument(skip(provider))]
pub async fn detail_traffic(
    provider: &dyn DirectionsProvider,
    origin: &str,
    destination: &str,
) -> TrafficReport {
    let query = DirectionsQuery {
        origin: origin.to_string(),
        destination: destination.to_string(),
        waypoints: Vec::new(),
        departure: DepartureTime::Now,
        traffic_model: Some(TrafficModel::BestGuess),
    };

    match provider.directions(&query).await {
        Ok(routes) => match routes.first() {
            Some(route) => {
                let segments: Vec<TrafficSegment> =
                    route.legs.iter().map(TrafficSegment::from_leg).collect();
                debug!(segments = segments.len(), "traffic detail computed");
                TrafficReport::Available(segments)
            }
            None => {
                let err = AssistantError::traffic(AssistantError::RouteNotFound.to_string());
                warn!(error = %err, "no traffic data");
                TrafficReport::unavailable(err.to_string())
            }
        },
        Err(e) => {
            let err = AssistantError::traffic(e.to_string());
            warn!(error = %err, "traffic detail failed");
            TrafficReport::unavailable(err.to_string())
        }
    }
}

/// Google Directions API client
pub struct GoogleDirectionsClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
    error_message: Option<String>,
}

impl GoogleDirectionsClient {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &DirectionsConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
        }
    }

    fn request_url(&self, query: &DirectionsQuery) -> String {
        let mut url = format!(
            "{}/directions/json?origin={}&destination={}&departure_time={}",
            self.base_url,
            urlencoding::encode(&query.origin),
            urlencoding::encode(&query.destination),
            urlencoding::encode(query.departure.as_query_value()),
        );
        if !query.waypoints.is_empty() {
            let waypoints: Vec<String> = query
                .waypoints
                .iter()
                .map(|w| urlencoding::encode(w).into_owned())
                .collect();
            url.push_str("&waypoints=");
            url.push_str(&waypoints.join("|"));
        }
        if let Some(model) = query.traffic_model {
            url.push_str("&traffic_model=");
            url.push_str(model.as_str());
        }
        url.push_str("&key=");
        url.push_str(&urlencoding::encode(&self.api_key));
        url
    }
}

/// Interpret a Directions API body
fn parse_directions_response(body: &str) -> std::result::Result<Vec<Route>, ProviderError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    match response.status.as_str() {
        "OK" => Ok(response.routes),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(Vec::new()),
        status => Err(ProviderError::Response(match response.error_message {
            Some(message) => format!("{status}: {message}"),
            None => status.to_string(),
        })),
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    #[instrument(name = "directions", skip(self, query), fields(origin = %query.origin, destination = %query.destination))]
    async fn directions(&self, query: &DirectionsQuery) -> std::result::Result<Vec<Route>, ProviderError> {
        let response = self.client.get(self.request_url(query)).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: text,
            });
        }
        parse_directions_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::http::build_client;
    use crate::models::TrafficDelay;
    use std::sync::Mutex;

    const TWO_LEG_BODY: &str = r#"{
        "status": "OK",
        "geocoded_waypoints": [],
        "routes": [
            {
                "summary": "I-84 W",
                "legs": [
                    {
                        "start_address": "Boston, MA, USA",
                        "end_address": "Hartford, CT, USA",
                        "distance": {"text": "102 mi", "value": 164000},
                        "duration": {"text": "1 hour 45 mins", "value": 6300},
                        "duration_in_traffic": {"text": "2 hours 5 mins", "value": 7500},
                        "steps": []
                    },
                    {
                        "start_address": "Hartford, CT, USA",
                        "end_address": "New York, NY, USA",
                        "distance": {"text": "117 mi", "value": 188000},
                        "duration": {"text": "2 hours 5 mins", "value": 7500},
                        "steps": []
                    }
                ]
            },
            {"legs": []}
        ]
    }"#;

    struct CannedDirections {
        result: std::result::Result<Vec<Route>, String>,
        queries: Mutex<Vec<DirectionsQuery>>,
    }

    impl CannedDirections {
        fn new(result: std::result::Result<Vec<Route>, String>) -> Self {
            Self {
                result,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DirectionsProvider for CannedDirections {
        async fn directions(
            &self,
            query: &DirectionsQuery,
        ) -> std::result::Result<Vec<Route>, ProviderError> {
            self.queries.lock().unwrap().push(query.clone());
            self.result.clone().map_err(ProviderError::Http)
        }
    }

    fn request(waypoints: &[&str], departure: &str) -> TravelRequest {
        TravelRequest {
            origin: "Boston".to_string(),
            destination: "New York".to_string(),
            waypoints: waypoints.iter().map(|w| w.to_string()).collect(),
            departure_time: DepartureTime::parse(departure),
        }
    }

    #[test]
    fn test_parse_ok_response() {
        let routes = parse_directions_response(TWO_LEG_BODY).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].legs.len(), 2);
        assert_eq!(routes[0].legs[1].duration_in_traffic, None);
    }

    #[test]
    fn test_parse_zero_results_is_empty() {
        let routes =
            parse_directions_response(r#"{"status": "ZERO_RESULTS", "routes": []}"#).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_parse_denied_carries_message() {
        let err = parse_directions_response(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "routes": []}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "REQUEST_DENIED: The provided API key is invalid."
        );
    }

    #[test]
    fn test_request_url_encodes_parameters() {
        let client = GoogleDirectionsClient::new(
            build_client(&HttpConfig::default()).unwrap(),
            &DirectionsConfig {
                api_key: Some("abc".to_string()),
                base_url: "https://maps.example.com/api/".to_string(),
            },
        );
        let url = client.request_url(&DirectionsQuery {
            origin: "Boston".to_string(),
            destination: "New York".to_string(),
            waypoints: vec!["Hartford".to_string(), "New Haven".to_string()],
            departure: DepartureTime::Now,
            traffic_model: Some(TrafficModel::BestGuess),
        });
        assert_eq!(
            url,
            "https://maps.example.com/api/directions/json?origin=Boston&destination=New%20York&departure_time=now&waypoints=Hartford|New%20Haven&traffic_model=best_guess&key=abc"
        );
    }

    #[tokio::test]
    async fn test_resolve_route_projects_first_route() {
        let provider = CannedDirections::new(Ok(parse_directions_response(TWO_LEG_BODY).unwrap()));
        let legs = resolve_route(&provider, &request(&["Hartford"], "NOW"))
            .await
            .unwrap();

        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].start_address, "Boston, MA, USA");
        assert_eq!(legs[0].duration_in_traffic, "2 hours 5 mins");
        assert_eq!(legs[1].end_address, "New York, NY, USA");
        assert_eq!(legs[1].duration_in_traffic, "Not available");

        let queries = provider.queries.lock().unwrap();
        assert_eq!(queries[0].waypoints, vec!["Hartford"]);
        assert_eq!(queries[0].departure, DepartureTime::Now);
        assert_eq!(queries[0].traffic_model, None);
    }

    #[tokio::test]
    async fn test_resolve_route_passes_time_expression_through() {
        let provider = CannedDirections::new(Ok(parse_directions_response(TWO_LEG_BODY).unwrap()));
        resolve_route(&provider, &request(&[], "next friday 6pm"))
            .await
            .unwrap();
        let queries = provider.queries.lock().unwrap();
        assert_eq!(
            queries[0].departure,
            DepartureTime::At("next friday 6pm".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_route_no_routes() {
        let provider = CannedDirections::new(Ok(Vec::new()));
        let err = resolve_route(&provider, &request(&[], "now")).await.unwrap_err();
        assert!(matches!(err, AssistantError::RouteNotFound));
    }

    #[tokio::test]
    async fn test_resolve_route_provider_failure() {
        let provider = CannedDirections::new(Err("quota exceeded".to_string()));
        let err = resolve_route(&provider, &request(&[], "now")).await.unwrap_err();
        assert!(matches!(err, AssistantError::Route { .. }));
        assert!(err.to_string().starts_with("Failed to fetch route:"));
    }

    #[tokio::test]
    async fn test_detail_traffic_ignores_waypoints_and_computes_delay() {
        let provider = CannedDirections::new(Ok(parse_directions_response(TWO_LEG_BODY).unwrap()));
        let report = detail_traffic(&provider, "Boston", "New York").await;

        let segments = report.segments().unwrap();
        assert_eq!(segments[0].traffic_delay, TrafficDelay::Seconds(1200));
        assert_eq!(segments[1].traffic_duration, "No traffic data");

        let queries = provider.queries.lock().unwrap();
        assert!(queries[0].waypoints.is_empty());
        assert_eq!(queries[0].departure, DepartureTime::Now);
        assert_eq!(queries[0].traffic_model, Some(TrafficModel::BestGuess));
    }

    #[tokio::test]
    async fn test_detail_traffic_failure_is_error_marker() {
        let provider = CannedDirections::new(Err("timeout".to_string()));
        let report = detail_traffic(&provider, "Boston", "New York").await;
        assert_eq!(
            report,
            TrafficReport::unavailable("Traffic fetch failed: HTTP error: timeout")
        );
    }

    #[tokio::test]
    async fn test_detail_traffic_no_routes() {
        let provider = CannedDirections::new(Ok(Vec::new()));
        let report = detail_traffic(&provider, "Boston", "Atlantis").await;
        assert_eq!(
            report,
            TrafficReport::unavailable("Traffic fetch failed: No route found")
        );
    }
}
