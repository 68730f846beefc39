use chrono::NaiveDateTime;
use gotransit_core::{Destination, NextService, NextServicePrediction, Stop, StopDetails};
use serde_json::Value;

use super::coerce::{
    coordinate, first_text, integer, parse_upstream_datetime, text, text_or_empty,
};
use super::ragged::{at, records, Record};

/// All-stops listing, in upstream order. Every location type is kept.
#[must_use]
pub fn normalize_stops(tree: &Value) -> Vec<Stop> {
    records(at(tree, &["Stations", "Station"]))
        .into_iter()
        .map(|station| Stop {
            id: text_or_empty(station, "LocationCode"),
            name: text_or_empty(station, "LocationName"),
            kind: text_or_empty(station, "LocationType"),
            public_id: text(station, "PublicStopId"),
        })
        .collect()
}

/// Details for one stop. `stop_code` is the code the caller asked for;
/// upstream does not always echo it back.
#[must_use]
pub fn normalize_stop_details(tree: &Value, stop_code: &str) -> StopDetails {
    let empty = Record::new();
    let stop = records(at(tree, &["Stop"]))
        .into_iter()
        .next()
        .unwrap_or(&empty);

    StopDetails {
        stop_code: stop_code.to_owned(),
        stop_name: text(stop, "StopName"),
        zone_code: text(stop, "ZoneCode"),
        address: assemble_address(stop),
        latitude: coordinate(stop.get("Latitude")),
        longitude: coordinate(stop.get("Longitude")),
    }
}

/// `"{number} {street}, {city}"` with absent parts left out entirely.
fn assemble_address(stop: &Record) -> Option<String> {
    let street = [text(stop, "StreetNumber"), text(stop, "StreetName")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let parts: Vec<String> = [Some(street).filter(|s| !s.is_empty()), text(stop, "City")]
        .into_iter()
        .flatten()
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Next-service predictions for a stop, one per line, in upstream order.
///
/// `now` anchors `minutes_until`; callers pass their own clock so the
/// result is reproducible.
#[must_use]
pub fn normalize_next_service(tree: &Value, stop_code: &str, now: NaiveDateTime) -> NextService {
    let lines = records(at(tree, &["NextService", "Lines"]))
        .into_iter()
        .map(|line| prediction(line, now))
        .collect();

    NextService {
        stop_code: stop_code.to_owned(),
        lines,
    }
}

fn prediction(line: &Record, now: NaiveDateTime) -> NextServicePrediction {
    let scheduled = text(line, "ScheduledDepartureTime");
    let computed = text(line, "ComputedDepartureTime");

    let scheduled_at = scheduled.as_deref().and_then(parse_upstream_datetime);
    let computed_at = computed.as_deref().and_then(parse_upstream_datetime);

    let is_delayed = match (&computed, &scheduled) {
        (None, _) | (Some(_), None) => false,
        (Some(c), Some(s)) => match (computed_at, scheduled_at) {
            (Some(c_at), Some(s_at)) => c_at != s_at,
            _ => c != s,
        },
    };

    let minutes_until = computed_at
        .or(scheduled_at)
        .map(|departs| (departs - now).num_minutes());

    NextServicePrediction {
        line_code: text_or_empty(line, "LineCode"),
        line_name: text_or_empty(line, "LineName"),
        service_type: text_or_empty(line, "ServiceType"),
        direction_name: text_or_empty(line, "DirectionName"),
        scheduled_departure_time: scheduled,
        computed_departure_time: computed,
        departure_status: text(line, "DepartureStatus"),
        platform_number: first_text(line, &["ActualPlatform", "ScheduledPlatform"]),
        trip_order: integer(line.get("TripOrder")),
        trip_number: text(line, "TripNumber"),
        update_time: text(line, "UpdateTime"),
        status: text_or_empty(line, "Status"),
        is_delayed,
        minutes_until,
        latitude: coordinate(line.get("Latitude")),
        longitude: coordinate(line.get("Longitude")),
    }
}

/// Destinations reachable from a stop, in upstream order.
#[must_use]
pub fn normalize_destinations(tree: &Value) -> Vec<Destination> {
    records(at(tree, &["Destinations", "Destination"]))
        .into_iter()
        .map(|dest| Destination {
            stop_code: text_or_empty(dest, "StopCode"),
            stop_name: text_or_empty(dest, "StopName"),
            line_code: text_or_empty(dest, "LineCode"),
            line_name: text_or_empty(dest, "LineName"),
            direction: text_or_empty(dest, "Direction"),
        })
        .collect()
}

#[cfg(test)]
#[path = "stops_test.rs"]
mod tests;
