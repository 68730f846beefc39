use gotransit_core::journeys::DEFAULT_CURRENCY;
use gotransit_core::{Fare, FareResponse, JourneyResponse, JourneyService, JourneyStop, JourneyTrip};
use serde_json::Value;

use super::coerce::{flag, integer, number, text, text_or_empty};
use super::ragged::{at, records, records_in, Record};

/// What the caller asked for; used only where upstream does not say.
#[derive(Debug, Clone, Copy)]
pub struct JourneyQuery<'a> {
    pub from_stop: &'a str,
    pub to_stop: &'a str,
    pub date: &'a str,
    pub start_time: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct FareQuery<'a> {
    pub from_stop: &'a str,
    pub to_stop: &'a str,
    pub operational_day: Option<&'a str>,
}

/// Journey options from a `SchJourneys` search result.
///
/// From/to/date/time echo upstream's confirmed values and fall back to the
/// query only when upstream omits them; with several `SchJourneys` entries
/// the last one reporting a value wins. Each leg's stops are sorted by their
/// `Order` field since upstream array order does not follow travel order.
#[must_use]
pub fn normalize_journey(tree: &Value, query: &JourneyQuery<'_>) -> JourneyResponse {
    let mut response = JourneyResponse {
        from_stop: query.from_stop.to_owned(),
        to_stop: query.to_stop.to_owned(),
        date: query.date.to_owned(),
        start_time: query.start_time.to_owned(),
        journeys: Vec::new(),
    };

    for sch in records(tree.get("SchJourneys")) {
        if let Some(date) = text(sch, "Date") {
            response.date = date;
        }
        if let Some(from) = text(sch, "From") {
            response.from_stop = from;
        }
        if let Some(to) = text(sch, "To") {
            response.to_stop = to;
        }
        if let Some(time) = text(sch, "Time") {
            response.start_time = time;
        }

        response
            .journeys
            .extend(records(sch.get("Services")).into_iter().map(service));
    }

    response
}

fn service(service: &Record) -> JourneyService {
    let trips: Vec<JourneyTrip> = records_in(service, &["Trips", "Trip"])
        .into_iter()
        .map(leg)
        .collect();

    let derived = u32::try_from(trips.len().saturating_sub(1)).unwrap_or(u32::MAX);
    let transfer_count = integer(service.get("transferCount"))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(derived);

    JourneyService {
        trip_hash: text(service, "tripHash"),
        color: text(service, "Colour"),
        start_time: text_or_empty(service, "StartTime"),
        end_time: text_or_empty(service, "EndTime"),
        duration: text(service, "Duration"),
        transfer_count,
        trips,
    }
}

fn leg(trip: &Record) -> JourneyTrip {
    let mut stops: Vec<JourneyStop> = records_in(trip, &["Stops", "Stop"])
        .into_iter()
        .map(|stop| JourneyStop {
            code: text_or_empty(stop, "Code"),
            order: integer(stop.get("Order")),
            time: text(stop, "Time"),
            is_major: flag(stop.get("IsMajor")),
        })
        .collect();
    stops.sort_by_key(|stop| stop.order.unwrap_or(0));

    JourneyTrip {
        number: text_or_empty(trip, "Number"),
        display: text_or_empty(trip, "Display"),
        line: text_or_empty(trip, "Line"),
        direction: text_or_empty(trip, "Direction"),
        vehicle_type: text_or_empty(trip, "Type"),
        depart_from_code: text_or_empty(trip, "departFromCode"),
        destination_stop_code: text_or_empty(trip, "destinationStopCode"),
        stops,
    }
}

/// Fares between two stops. Currency defaults to CAD; an unparseable price
/// is reported as absent rather than zero.
#[must_use]
pub fn normalize_fares(tree: &Value, query: &FareQuery<'_>) -> FareResponse {
    let fares = records(at(tree, &["Fares", "Fare"]))
        .into_iter()
        .map(|fare| Fare {
            fare_type: text_or_empty(fare, "FareType"),
            price: number(fare.get("Price")),
            currency: text(fare, "Currency").unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
        })
        .collect();

    FareResponse {
        from_stop: query.from_stop.to_owned(),
        to_stop: query.to_stop.to_owned(),
        operational_day: query.operational_day.map(str::to_owned),
        fares,
    }
}

#[cfg(test)]
#[path = "journeys_test.rs"]
mod tests;
