//! Data models for the travel assistant
//!
//! This module contains the core domain models organized by concern:
//! - Request: the structured travel request pulled out of free text
//! - Route: provider-neutral legs, leg summaries and traffic segments
//! - Weather: current conditions per location
//! - State: the immutable snapshot that follow-up questions are answered against

pub mod request;
pub mod route;
pub mod state;
pub mod weather;

// Re-export all public types for convenient access
pub use request::{DepartureTime, TravelRequest};
pub use route::{
    DelayUnknown, LegSummary, Route, RouteLeg, TextValue, TrafficDelay, TrafficReport,
    TrafficSegment,
};
pub use state::TravelState;
pub use weather::{WeatherInfo, WeatherReport};
