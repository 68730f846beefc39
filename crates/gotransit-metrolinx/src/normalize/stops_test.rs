use chrono::NaiveDate;
use serde_json::json;

use super::*;

fn at_eight() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

// -----------------------------------------------------------------------
// normalize_stops
// -----------------------------------------------------------------------

#[test]
fn stops_keep_upstream_order_and_every_type() {
    let tree = json!({
        "Stations": {
            "Station": [
                {"LocationCode": "UN", "LocationName": "Union Station", "LocationType": "Train Station", "PublicStopId": null},
                {"LocationCode": "02300", "LocationName": "Yorkdale Bus Terminal", "LocationType": "Bus Terminal", "PublicStopId": "2300"},
                {"LocationCode": "AG", "LocationName": "Agincourt GO", "LocationType": "Train & Bus Station"}
            ]
        }
    });

    let stops = normalize_stops(&tree);
    let ids: Vec<&str> = stops.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["UN", "02300", "AG"]);
    assert_eq!(stops[1].kind, "Bus Terminal");
    assert_eq!(stops[1].public_id.as_deref(), Some("2300"));
    assert_eq!(stops[0].public_id, None);
}

#[test]
fn stops_accept_single_collapsed_station() {
    let tree = json!({
        "Stations": {"Station": {"LocationCode": "OS", "LocationName": "Oshawa GO", "LocationType": "Train Station"}}
    });
    let stops = normalize_stops(&tree);
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].name, "Oshawa GO");
}

#[test]
fn stops_empty_when_collection_absent() {
    assert!(normalize_stops(&json!({})).is_empty());
    assert!(normalize_stops(&json!({"Stations": null})).is_empty());
    assert!(normalize_stops(&json!({"Stations": {"Station": null}})).is_empty());
}

// -----------------------------------------------------------------------
// normalize_stop_details
// -----------------------------------------------------------------------

#[test]
fn stop_details_assemble_full_address() {
    let tree = json!({
        "Stop": {
            "StopName": "Union Station",
            "ZoneCode": "02",
            "StreetNumber": "65",
            "StreetName": "Front St W",
            "City": "Toronto",
            "Latitude": "43.6453",
            "Longitude": "-79.3806"
        }
    });

    let details = normalize_stop_details(&tree, "UN");
    assert_eq!(details.stop_code, "UN");
    assert_eq!(details.stop_name.as_deref(), Some("Union Station"));
    assert_eq!(details.zone_code.as_deref(), Some("02"));
    assert_eq!(details.address.as_deref(), Some("65 Front St W, Toronto"));
    assert_eq!(details.latitude, Some(43.6453));
    assert_eq!(details.longitude, Some(-79.3806));
}

#[test]
fn stop_details_skip_absent_address_parts() {
    let only_city = json!({"Stop": {"City": "Oshawa"}});
    assert_eq!(
        normalize_stop_details(&only_city, "OS").address.as_deref(),
        Some("Oshawa")
    );

    let no_city = json!({"Stop": {"StreetNumber": "", "StreetName": "Bloor St"}});
    assert_eq!(
        normalize_stop_details(&no_city, "BL").address.as_deref(),
        Some("Bloor St")
    );

    let nothing = json!({"Stop": {}});
    assert_eq!(normalize_stop_details(&nothing, "XX").address, None);
}

#[test]
fn stop_details_drop_unparseable_coordinates() {
    let tree = json!({"Stop": {"Latitude": "unknown", "Longitude": ""}});
    let details = normalize_stop_details(&tree, "UN");
    assert_eq!(details.latitude, None);
    assert_eq!(details.longitude, None);
}

#[test]
fn stop_details_total_on_empty_tree() {
    let details = normalize_stop_details(&json!({}), "ZZZ");
    assert_eq!(details.stop_code, "ZZZ");
    assert_eq!(details.stop_name, None);
    assert_eq!(details.address, None);
}

// -----------------------------------------------------------------------
// normalize_next_service
// -----------------------------------------------------------------------

fn next_service_line(extra: serde_json::Value) -> serde_json::Value {
    let mut base = json!({
        "LineCode": "LW",
        "LineName": "Lakeshore West",
        "ServiceType": "T",
        "DirectionName": "LW - Aldershot GO",
        "ScheduledDepartureTime": "2024-03-15 08:15:00",
        "TripNumber": "1234",
        "Status": "S"
    });
    if let (Some(base_map), Some(extra_map)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra_map {
            base_map.insert(k.clone(), v.clone());
        }
    }
    base
}

fn single_prediction(extra: serde_json::Value) -> NextServicePrediction {
    let tree = json!({"NextService": {"Lines": next_service_line(extra)}});
    let mut service = normalize_next_service(&tree, "UN", at_eight());
    assert_eq!(service.lines.len(), 1);
    service.lines.remove(0)
}

#[test]
fn platform_prefers_actual_over_scheduled() {
    let both = single_prediction(json!({"ActualPlatform": "7", "ScheduledPlatform": "3"}));
    assert_eq!(both.platform_number.as_deref(), Some("7"));

    let scheduled_only = single_prediction(json!({"ScheduledPlatform": "3"}));
    assert_eq!(scheduled_only.platform_number.as_deref(), Some("3"));

    let blank_actual = single_prediction(json!({"ActualPlatform": " ", "ScheduledPlatform": "3"}));
    assert_eq!(blank_actual.platform_number.as_deref(), Some("3"));

    let neither = single_prediction(json!({}));
    assert_eq!(neither.platform_number, None);
}

#[test]
fn delay_flag_follows_computed_time() {
    let on_time = single_prediction(json!({"ComputedDepartureTime": "2024-03-15 08:15:00"}));
    assert!(!on_time.is_delayed);

    let late = single_prediction(json!({"ComputedDepartureTime": "2024-03-15 08:21:00"}));
    assert!(late.is_delayed);

    let unknown = single_prediction(json!({}));
    assert!(!unknown.is_delayed);
    assert_eq!(unknown.computed_departure_time, None);
}

#[test]
fn delay_flag_compares_times_not_spelling() {
    let same_minute = single_prediction(json!({"ComputedDepartureTime": "2024-03-15 08:15"}));
    assert!(!same_minute.is_delayed);
}

#[test]
fn minutes_until_uses_computed_then_scheduled() {
    let scheduled_only = single_prediction(json!({}));
    assert_eq!(scheduled_only.minutes_until, Some(15));

    let late = single_prediction(json!({"ComputedDepartureTime": "2024-03-15 08:21:00"}));
    assert_eq!(late.minutes_until, Some(21));

    let unparseable = single_prediction(json!({"ScheduledDepartureTime": "soon"}));
    assert_eq!(unparseable.minutes_until, None);
}

#[test]
fn prediction_coordinates_filter_sentinel() {
    let sentinel = single_prediction(json!({"Latitude": -1.0, "Longitude": -1.0}));
    assert_eq!(sentinel.latitude, None);
    assert_eq!(sentinel.longitude, None);

    let located = single_prediction(json!({"Latitude": 43.59, "Longitude": "-79.54"}));
    assert_eq!(located.latitude, Some(43.59));
    assert_eq!(located.longitude, Some(-79.54));
}

#[test]
fn next_service_keeps_upstream_line_order() {
    let tree = json!({
        "NextService": {
            "Lines": [
                next_service_line(json!({"LineCode": "LE", "TripOrder": 1})),
                next_service_line(json!({"LineCode": "LW", "TripOrder": "2"})),
                next_service_line(json!({"LineCode": "BR", "TripOrder": 3}))
            ]
        }
    });
    let service = normalize_next_service(&tree, "UN", at_eight());
    let codes: Vec<&str> = service.lines.iter().map(|l| l.line_code.as_str()).collect();
    assert_eq!(codes, vec!["LE", "LW", "BR"]);
    assert_eq!(service.lines[1].trip_order, Some(2));
}

#[test]
fn next_service_empty_when_no_lines() {
    let service = normalize_next_service(&json!({"NextService": null}), "UN", at_eight());
    assert_eq!(service.stop_code, "UN");
    assert!(service.lines.is_empty());
}

// -----------------------------------------------------------------------
// normalize_destinations
// -----------------------------------------------------------------------

#[test]
fn destinations_flatten_ragged_collection() {
    let tree = json!({
        "Destinations": {
            "Destination": {"StopCode": "OS", "StopName": "Oshawa GO", "LineCode": "LE", "LineName": "Lakeshore East", "Direction": "E"}
        }
    });
    let destinations = normalize_destinations(&tree);
    assert_eq!(destinations.len(), 1);
    assert_eq!(destinations[0].stop_code, "OS");
    assert_eq!(destinations[0].direction, "E");
}
