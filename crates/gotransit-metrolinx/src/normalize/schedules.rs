use gotransit_core::{Line, LineSchedule, LineStop, TripSchedule, TripStop};
use serde_json::Value;

use super::coerce::{first_text, flag, integer, text, text_or_empty};
use super::ragged::{at, records, records_in, Record};

/// Lines in effect on a date, one entry per line direction.
///
/// A line's `Variant` collection lists its directions; a line without
/// variants is reported once using its own fields.
#[must_use]
pub fn normalize_lines(tree: &Value) -> Vec<Line> {
    records(at(tree, &["AllLines", "Line"]))
        .into_iter()
        .flat_map(|line| {
            let code = text_or_empty(line, "Code");
            let name = text_or_empty(line, "Name");
            let vehicle_type = vehicle_type(line);
            let variants = records(line.get("Variant"));

            if variants.is_empty() {
                return vec![Line {
                    code,
                    name,
                    direction: text_or_empty(line, "Direction"),
                    vehicle_type,
                }];
            }

            variants
                .into_iter()
                .map(|variant| Line {
                    code: text(variant, "Code").unwrap_or_else(|| code.clone()),
                    name: text(variant, "Display").unwrap_or_else(|| name.clone()),
                    direction: text_or_empty(variant, "Direction"),
                    vehicle_type: vehicle_type.clone(),
                })
                .collect()
        })
        .collect()
}

fn vehicle_type(line: &Record) -> String {
    if flag(line.get("IsBus")) {
        "Bus".to_owned()
    } else if flag(line.get("IsTrain")) {
        "Train".to_owned()
    } else {
        text_or_empty(line, "Type")
    }
}

/// Stops served by a line direction, sorted by their sequence field.
#[must_use]
pub fn normalize_line_stops(tree: &Value) -> Vec<LineStop> {
    let collection = at(tree, &["Stops", "Stop"]).or_else(|| at(tree, &["Line", "Stop"]));

    let mut stops: Vec<LineStop> = records(collection)
        .into_iter()
        .map(|stop| LineStop {
            stop_code: text_or_empty(stop, "Code"),
            stop_name: text_or_empty(stop, "Name"),
            sequence: sequence(stop),
            scheduled_time: text(stop, "Time"),
        })
        .collect();
    stops.sort_by_key(|stop| stop.sequence.unwrap_or(0));
    stops
}

/// Schedule for a line direction on `date`.
///
/// Line identity echoes upstream and falls back to the request. Trip
/// entries are forwarded as upstream sent them.
#[must_use]
pub fn normalize_line_schedule(
    tree: &Value,
    line_code: &str,
    direction: &str,
    date: &str,
) -> LineSchedule {
    let empty = Record::new();
    let line = records(tree.get("Line")).into_iter().next().unwrap_or(&empty);

    let trips = records(at(tree, &["Trips", "Trip"]))
        .into_iter()
        .map(|trip| Value::Object(trip.clone()))
        .collect();

    LineSchedule {
        line_code: text(line, "Code").unwrap_or_else(|| line_code.to_owned()),
        line_name: text_or_empty(line, "Name"),
        direction: text(line, "Direction").unwrap_or_else(|| direction.to_owned()),
        date: date.to_owned(),
        trips,
    }
}

/// Stop-by-stop schedule of one trip, from the first `Trips.Trip` entry.
#[must_use]
pub fn normalize_trip_schedule(tree: &Value, trip_number: &str, date: &str) -> TripSchedule {
    let empty = Record::new();
    let trip = records(at(tree, &["Trips", "Trip"]))
        .into_iter()
        .next()
        .unwrap_or(&empty);

    let mut stops: Vec<TripStop> = records_in(trip, &["Stops", "Stop"])
        .into_iter()
        .map(|stop| TripStop {
            stop_code: text_or_empty(stop, "Code"),
            stop_name: text_or_empty(stop, "Name"),
            sequence: sequence(stop),
            scheduled_arrival: first_text(stop, &["ArrivalTime", "Time"]),
            scheduled_departure: first_text(stop, &["DepartureTime", "Time"]),
        })
        .collect();
    stops.sort_by_key(|stop| stop.sequence.unwrap_or(0));

    TripSchedule {
        trip_number: text(trip, "Number").unwrap_or_else(|| trip_number.to_owned()),
        line_code: text_or_empty(trip, "Line"),
        line_name: text_or_empty(trip, "LineName"),
        direction: text_or_empty(trip, "Direction"),
        date: date.to_owned(),
        stops,
    }
}

fn sequence(stop: &Record) -> Option<i64> {
    integer(stop.get("Order")).or_else(|| integer(stop.get("Sequence")))
}
