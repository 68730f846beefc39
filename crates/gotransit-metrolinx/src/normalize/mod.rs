//! Pure functions reshaping upstream JSON trees into the canonical records
//! in [`gotransit_core`].
//!
//! Every normalizer is total: missing or oddly-shaped optional fields yield
//! absent values or empty lists, never an error. Nothing here touches the
//! network or the clock.

mod alerts;
mod coerce;
mod journeys;
mod ragged;
mod schedules;
mod stops;

pub use alerts::{normalize_alerts, normalize_exceptions, normalize_union_departures};
pub use journeys::{normalize_fares, normalize_journey, FareQuery, JourneyQuery};
pub use schedules::{
    normalize_line_schedule, normalize_line_stops, normalize_lines, normalize_trip_schedule,
};
pub use stops::{
    normalize_destinations, normalize_next_service, normalize_stop_details, normalize_stops,
};
