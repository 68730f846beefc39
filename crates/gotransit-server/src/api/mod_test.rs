use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn app_for(server: &MockServer) -> Router {
    let client = MetrolinxClient::with_base_url("test-key", 5, &server.uri())
        .expect("client construction should not fail");
    build_app(AppState { client })
}

async fn send_get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("x-request-id", "req-test")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("validation_error", StatusCode::BAD_REQUEST),
        ("upstream_unavailable", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[test]
fn upstream_error_keeps_upstream_status() {
    let response = ApiError::upstream("req-1", 503, "down").into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Only error statuses are echoed.
    let response = ApiError::upstream("req-1", 302, "moved").into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn health_needs_no_upstream() {
    let server = MockServer::start().await;
    let (status, json) = send_get(app_for(&server), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-test");
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let server = MockServer::start().await;
    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header");
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn stop_details_404_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Stop/Details/ZZZ"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (status, json) = send_get(app_for(&server), "/api/stops/ZZZ/details").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "stop ZZZ not found");
}

#[tokio::test]
async fn upstream_503_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Stop/All"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, json) = send_get(app_for(&server), "/api/stops").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["code"], "upstream_error");
}

#[tokio::test]
async fn malformed_date_is_rejected_before_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (status, json) = send_get(
        app_for(&server),
        "/api/journeys?from_stop=UN&to_stop=OS&journey_date=2024-3-15",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn unparseable_query_uses_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    for uri in [
        "/api/journeys?from_stop=UN&to_stop=OS&max_journeys=abc",
        "/api/journeys?from_stop=UN&to_stop=OS&max_journeys=-1",
    ] {
        let (status, json) = send_get(app_for(&server), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["meta"]["request_id"], "req-test");
    }
}

#[tokio::test]
async fn journeys_end_to_end() {
    let server = MockServer::start().await;
    let body = json!({
        "SchJourneys": {
            "Date": "20240315",
            "Time": "0800",
            "From": "UN",
            "To": "OS",
            "Services": [
                {
                    "tripHash": "a1",
                    "StartTime": "08:13",
                    "EndTime": "09:08",
                    "Trips": {"Trip": {
                        "Number": "4510",
                        "Stops": {"Stop": [
                            {"Code": "OS", "Order": 2},
                            {"Code": "UN", "Order": 1}
                        ]}
                    }}
                },
                {
                    "tripHash": "b2",
                    "StartTime": "08:43",
                    "EndTime": "09:38",
                    "Trips": {"Trip": {"Number": "4512"}}
                }
            ]
        }
    });
    Mock::given(method("GET"))
        .and(path("/Schedule/Journey/20240315/UN/OS/0800/5"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let (status, json) = send_get(
        app_for(&server),
        "/api/journeys?from_stop=UN&to_stop=OS&journey_date=2024-03-15&start_time=08:00",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["from_stop"], "UN");
    assert_eq!(data["date"], "20240315");
    let journeys = data["journeys"].as_array().expect("journeys array");
    assert_eq!(journeys.len(), 2);
    assert_eq!(journeys[0]["transfer_count"], 0);
    assert_eq!(journeys[0]["trips"][0]["stops"][0]["code"], "UN");
}

#[tokio::test]
async fn all_alerts_combines_both_feeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ServiceUpdate/ServiceAlert/All"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Alerts": {"Alert": {"AlertId": "s1", "Title": "Delay"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ServiceUpdate/InformationAlert/All"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Alerts": {"Alert": [
                {"AlertId": "i1", "Title": "Elevator"},
                {"AlertId": "i2", "Title": "Parking"}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, json) = send_get(app_for(&server), "/api/alerts/all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["service_alerts"][0]["id"], "s1");
    assert_eq!(json["data"]["service_alerts"][0]["alert_type"], "Service");
    assert_eq!(
        json["data"]["information_alerts"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn unknown_exception_scope_is_not_found() {
    let server = MockServer::start().await;
    let (status, json) = send_get(app_for(&server), "/api/alerts/exceptions/ferry").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn in_service_is_passed_through() {
    let server = MockServer::start().await;
    let body = json!({"Trips": {"Trip": [{"TripNumber": "4510", "Latitude": 43.6}]}});
    Mock::given(method("GET"))
        .and(path("/ServiceataGlance/UPX/All"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let (status, json) = send_get(app_for(&server), "/api/schedules/in-service/upx").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], body);
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let server = MockServer::start().await;
    let (status, json) = send_get(app_for(&server), "/api/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["meta"]["request_id"], "req-test");
}
