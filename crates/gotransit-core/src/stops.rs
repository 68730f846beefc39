use serde::{Deserialize, Serialize};

/// One entry from the all-stops listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Upstream location code, e.g. `"UN"`.
    pub id: String,
    pub name: String,
    /// Location type as reported upstream (train station, bus stop, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub public_id: Option<String>,
}

/// Physical attributes of a single stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDetails {
    pub stop_code: String,
    pub stop_name: Option<String>,
    pub zone_code: Option<String>,
    /// Street number, street name and city, skipping whichever are absent.
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Upcoming departure of one line at a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextServicePrediction {
    pub line_code: String,
    pub line_name: String,
    pub service_type: String,
    pub direction_name: String,
    pub scheduled_departure_time: Option<String>,
    pub computed_departure_time: Option<String>,
    pub departure_status: Option<String>,
    /// Actual platform when upstream reports one, else the scheduled one.
    pub platform_number: Option<String>,
    pub trip_order: Option<i64>,
    pub trip_number: Option<String>,
    pub update_time: Option<String>,
    pub status: String,
    /// True only when a computed time exists and differs from the schedule.
    pub is_delayed: bool,
    pub minutes_until: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextService {
    pub stop_code: String,
    pub lines: Vec<NextServicePrediction>,
}

/// A destination reachable from a stop within a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub stop_code: String,
    pub stop_name: String,
    pub line_code: String,
    pub line_name: String,
    pub direction: String,
}
