//! Route, leg and traffic models

use serde::{Deserialize, Serialize};

/// Display text paired with its numeric value (meters or seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: i64,
}

/// One leg of a route as returned by a directions provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    pub distance: TextValue,
    /// Baseline, traffic-free duration
    #[serde(default)]
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub duration_in_traffic: Option<TextValue>,
}

/// Candidate route; legs are ordered origin → waypoints → destination
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

const NOT_AVAILABLE: &str = "Not available";
const NO_TRAFFIC_DATA: &str = "No traffic data";

/// Essential details of one leg, kept in the travel state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSummary {
    pub start_address: String,
    pub end_address: String,
    pub distance: String,
    pub duration: String,
    pub duration_in_traffic: String,
}

impl LegSummary {
    #[must_use]
    pub fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            start_address: leg.start_address.clone(),
            end_address: leg.end_address.clone(),
            distance: leg.distance.text.clone(),
            duration: leg
                .duration
                .as_ref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.text.clone()),
            duration_in_traffic: leg
                .duration_in_traffic
                .as_ref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.text.clone()),
        }
    }
}

/// Why a traffic delay could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnknown {
    /// The provider reported no baseline duration
    MissingBaseline,
    /// The provider reported no traffic-adjusted duration
    MissingTrafficDuration,
}

/// Extra travel time caused by traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrafficDelay {
    /// Traffic-adjusted minus baseline duration; negative when traffic is lighter than usual
    Seconds(i64),
    Unknown(DelayUnknown),
}

impl TrafficDelay {
    /// Delay for a leg. Missing durations yield [`TrafficDelay::Unknown`], never zero.
    #[must_use]
    pub fn for_leg(leg: &RouteLeg) -> Self {
        match (&leg.duration_in_traffic, &leg.duration) {
            (Some(traffic), Some(baseline)) => Self::Seconds(traffic.value - baseline.value),
            (None, _) => Self::Unknown(DelayUnknown::MissingTrafficDuration),
            (Some(_), None) => Self::Unknown(DelayUnknown::MissingBaseline),
        }
    }

    #[must_use]
    pub fn seconds(&self) -> Option<i64> {
        match self {
            Self::Seconds(seconds) => Some(*seconds),
            Self::Unknown(_) => None,
        }
    }
}

/// Traffic details for one origin → destination leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSegment {
    pub segment_start: String,
    pub segment_end: String,
    pub traffic_duration: String,
    pub traffic_delay: TrafficDelay,
}

impl TrafficSegment {
    #[must_use]
    pub fn from_leg(leg: &RouteLeg) -> Self {
        Self {
            segment_start: leg.start_address.clone(),
            segment_end: leg.end_address.clone(),
            traffic_duration: leg
                .duration_in_traffic
                .as_ref()
                .map_or_else(|| NO_TRAFFIC_DATA.to_string(), |d| d.text.clone()),
            traffic_delay: TrafficDelay::for_leg(leg),
        }
    }
}

/// Traffic conditions: the segments, or why they could not be fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrafficReport {
    Available(Vec<TrafficSegment>),
    Unavailable { error: String },
}

impl TrafficReport {
    #[must_use]
    pub fn unavailable<S: Into<String>>(error: S) -> Self {
        Self::Unavailable {
            error: error.into(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> Option<&[TrafficSegment]> {
        match self {
            Self::Available(segments) => Some(segments),
            Self::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leg(duration: Option<i64>, in_traffic: Option<i64>) -> RouteLeg {
        RouteLeg {
            start_address: "Boston, MA, USA".to_string(),
            end_address: "New York, NY, USA".to_string(),
            distance: TextValue {
                text: "215 mi".to_string(),
                value: 346_000,
            },
            duration: duration.map(|value| TextValue {
                text: format!("{} mins", value / 60),
                value,
            }),
            duration_in_traffic: in_traffic.map(|value| TextValue {
                text: format!("{} mins", value / 60),
                value,
            }),
        }
    }

    #[test]
    fn test_delay_is_traffic_minus_baseline() {
        assert_eq!(
            TrafficDelay::for_leg(&leg(Some(300), Some(450))),
            TrafficDelay::Seconds(150)
        );
    }

    #[test]
    fn test_delay_can_be_negative() {
        assert_eq!(
            TrafficDelay::for_leg(&leg(Some(600), Some(540))).seconds(),
            Some(-60)
        );
    }

    #[test]
    fn test_missing_baseline_is_unknown_not_full_duration() {
        let delay = TrafficDelay::for_leg(&leg(None, Some(450)));
        assert_eq!(delay, TrafficDelay::Unknown(DelayUnknown::MissingBaseline));
        assert_eq!(delay.seconds(), None);
    }

    #[test]
    fn test_missing_traffic_duration_is_unknown() {
        let segment = TrafficSegment::from_leg(&leg(Some(300), None));
        assert_eq!(segment.traffic_duration, "No traffic data");
        assert_eq!(
            segment.traffic_delay,
            TrafficDelay::Unknown(DelayUnknown::MissingTrafficDuration)
        );
    }

    #[test]
    fn test_leg_summary_substitutes_not_available() {
        let summary = LegSummary::from_leg(&leg(Some(300), None));
        assert_eq!(summary.distance, "215 mi");
        assert_eq!(summary.duration, "5 mins");
        assert_eq!(summary.duration_in_traffic, "Not available");
    }

    #[test]
    fn test_traffic_report_serialization_shapes() {
        let ok = TrafficReport::Available(vec![TrafficSegment::from_leg(&leg(
            Some(300),
            Some(450),
        ))]);
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value[0]["traffic_delay"], json!(150));

        let unknown = TrafficReport::Available(vec![TrafficSegment::from_leg(&leg(
            None,
            Some(450),
        ))]);
        let value = serde_json::to_value(&unknown).unwrap();
        assert_eq!(value[0]["traffic_delay"], json!("missing_baseline"));

        let failed = TrafficReport::unavailable("Traffic fetch failed: timeout");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "Traffic fetch failed: timeout"})
        );
        assert!(failed.segments().is_none());
    }
}
