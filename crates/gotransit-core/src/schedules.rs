use serde::{Deserialize, Serialize};

/// One direction of a line in effect on a service date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub code: String,
    pub name: String,
    pub direction: String,
    pub vehicle_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStop {
    pub stop_code: String,
    pub stop_name: String,
    pub sequence: Option<i64>,
    pub scheduled_time: Option<String>,
}

/// Line schedule for one date. Trip entries are forwarded as upstream sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSchedule {
    pub line_code: String,
    pub line_name: String,
    pub direction: String,
    pub date: String,
    pub trips: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripStop {
    pub stop_code: String,
    pub stop_name: String,
    pub sequence: Option<i64>,
    pub scheduled_arrival: Option<String>,
    pub scheduled_departure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSchedule {
    pub trip_number: String,
    pub line_code: String,
    pub line_name: String,
    pub direction: String,
    pub date: String,
    pub stops: Vec<TripStop>,
}
