use serde::{Deserialize, Serialize};

/// Currency reported when upstream omits one.
pub const DEFAULT_CURRENCY: &str = "CAD";

/// A stop visited by one leg of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyStop {
    pub code: String,
    pub order: Option<i64>,
    pub time: Option<String>,
    pub is_major: bool,
}

/// One vehicle trip within a journey option. Stops are in travel order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyTrip {
    pub number: String,
    pub display: String,
    pub line: String,
    pub direction: String,
    pub vehicle_type: String,
    pub depart_from_code: String,
    pub destination_stop_code: String,
    pub stops: Vec<JourneyStop>,
}

/// One itinerary option made of one or more legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyService {
    pub trip_hash: Option<String>,
    pub color: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub duration: Option<String>,
    pub transfer_count: u32,
    pub trips: Vec<JourneyTrip>,
}

/// Journey options between two stops.
///
/// `from_stop`, `to_stop`, `date` and `start_time` echo what upstream
/// confirmed, falling back to the request only when upstream is silent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyResponse {
    pub from_stop: String,
    pub to_stop: String,
    pub date: String,
    pub start_time: String,
    pub journeys: Vec<JourneyService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub fare_type: String,
    pub price: Option<f64>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareResponse {
    pub from_stop: String,
    pub to_stop: String,
    pub operational_day: Option<String>,
    pub fares: Vec<Fare>,
}
