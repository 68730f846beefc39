use gotransit_core::alerts::{DEFAULT_EXCEPTION_TYPE, DEFAULT_VEHICLE_TYPE};
use gotransit_core::{Alert, AlertKind, ServiceException, UnionDeparture};
use serde_json::Value;

use super::coerce::{text, text_or_empty};
use super::ragged::{at, codes, records, Record};

/// Alerts from either the service or the information feed.
#[must_use]
pub fn normalize_alerts(tree: &Value, kind: AlertKind) -> Vec<Alert> {
    records(at(tree, &["Alerts", "Alert"]))
        .into_iter()
        .map(|alert| Alert {
            id: text(alert, "AlertId"),
            title: text_or_empty(alert, "Title"),
            description: text_or_empty(alert, "Description"),
            alert_type: kind,
            severity: text(alert, "Severity"),
            affected_lines: affected(alert, "AffectedLines", "Line", "LineCode"),
            affected_stops: affected(alert, "AffectedStops", "Stop", "StopCode"),
            start_time: text(alert, "StartTime"),
            end_time: text(alert, "EndTime"),
            created_at: text(alert, "CreatedAt"),
            updated_at: text(alert, "UpdatedAt"),
        })
        .collect()
}

/// Train, bus, or combined schedule exceptions.
#[must_use]
pub fn normalize_exceptions(tree: &Value) -> Vec<ServiceException> {
    records(at(tree, &["Exceptions", "Exception"]))
        .into_iter()
        .map(|exception| ServiceException {
            trip_number: text_or_empty(exception, "TripNumber"),
            line_code: text_or_empty(exception, "LineCode"),
            line_name: text_or_empty(exception, "LineName"),
            direction: text_or_empty(exception, "Direction"),
            exception_type: text(exception, "ExceptionType")
                .unwrap_or_else(|| DEFAULT_EXCEPTION_TYPE.to_owned()),
            affected_stops: affected(exception, "AffectedStops", "Stop", "StopCode"),
            scheduled_date: text_or_empty(exception, "ScheduledDate"),
            scheduled_time: text(exception, "ScheduledTime"),
            reason: text(exception, "Reason"),
        })
        .collect()
}

/// Nearest departures from Union Station.
#[must_use]
pub fn normalize_union_departures(tree: &Value) -> Vec<UnionDeparture> {
    records(at(tree, &["Departures", "Departure"]))
        .into_iter()
        .map(|departure| UnionDeparture {
            trip_number: text_or_empty(departure, "TripNumber"),
            line_code: text_or_empty(departure, "LineCode"),
            line_name: text_or_empty(departure, "LineName"),
            direction: text_or_empty(departure, "Direction"),
            destination: text_or_empty(departure, "Destination"),
            scheduled_departure: text_or_empty(departure, "ScheduledDeparture"),
            predicted_departure: text(departure, "PredictedDeparture"),
            platform: text(departure, "Platform"),
            vehicle_type: text(departure, "VehicleType")
                .unwrap_or_else(|| DEFAULT_VEHICLE_TYPE.to_owned()),
            status: text(departure, "Status"),
        })
        .collect()
}

/// Codes under `record[group][member]`, where `member` is ragged and each
/// element is a bare code or an object holding it under `key`.
fn affected(record: &Record, group: &str, member: &str, key: &str) -> Vec<String> {
    codes(record.get(group).and_then(|g| g.get(member)), key)
}
