use serde::{Deserialize, Serialize};

/// Exception type reported when upstream omits one.
pub const DEFAULT_EXCEPTION_TYPE: &str = "Cancelled";
/// Vehicle type reported for a Union departure when upstream omits one.
pub const DEFAULT_VEHICLE_TYPE: &str = "Train";

/// Which upstream feed an alert came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Service,
    Information,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub alert_type: AlertKind,
    pub severity: Option<String>,
    pub affected_lines: Vec<String>,
    pub affected_stops: Vec<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Both alert feeds, fetched one after the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllAlerts {
    pub service_alerts: Vec<Alert>,
    pub information_alerts: Vec<Alert>,
}

/// A cancelled or modified scheduled trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceException {
    pub trip_number: String,
    pub line_code: String,
    pub line_name: String,
    pub direction: String,
    pub exception_type: String,
    pub affected_stops: Vec<String>,
    pub scheduled_date: String,
    pub scheduled_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionDeparture {
    pub trip_number: String,
    pub line_code: String,
    pub line_name: String,
    pub direction: String,
    pub destination: String,
    pub scheduled_departure: String,
    pub predicted_departure: Option<String>,
    pub platform: Option<String>,
    pub vehicle_type: String,
    pub status: Option<String>,
}
