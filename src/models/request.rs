//! Structured travel request model

use serde::{Deserialize, Serialize};

/// When the trip starts, as understood by the directions provider
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartureTime {
    /// Depart immediately
    #[default]
    Now,
    /// Provider-specific time expression, passed through untouched
    At(String),
}

impl DepartureTime {
    /// Map the literal "now" (any case) to [`DepartureTime::Now`], keep anything else verbatim
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("now") {
            Self::Now
        } else {
            Self::At(value.to_string())
        }
    }

    /// Value sent as the `departure_time` directive
    #[must_use]
    pub fn as_query_value(&self) -> &str {
        match self {
            Self::Now => "now",
            Self::At(value) => value,
        }
    }
}

impl Serialize for DepartureTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query_value())
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Travel request extracted from the user's description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    /// Starting location
    pub origin: String,
    /// Final destination
    pub destination: String,
    /// Stops in between, in travel order
    #[serde(default)]
    pub waypoints: Vec<String>,
    /// Planned start of the trip
    #[serde(default)]
    pub departure_time: DepartureTime,
}

impl TravelRequest {
    /// Every location that needs weather: origin, destination, then waypoints.
    /// Duplicates are kept.
    #[must_use]
    pub fn locations(&self) -> Vec<String> {
        let mut locations = Vec::with_capacity(self.waypoints.len() + 2);
        locations.push(self.origin.clone());
        locations.push(self.destination.clone());
        locations.extend(self.waypoints.iter().cloned());
        locations
    }
}
