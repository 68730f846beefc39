use axum::{
    extract::{Path, State},
    Extension, Json,
};
use gotransit_core::{Alert, AlertKind, AllAlerts, ServiceException, UnionDeparture};
use gotransit_metrolinx::normalize::{
    normalize_alerts, normalize_exceptions, normalize_union_departures,
};
use gotransit_metrolinx::{ExceptionScope, RealtimeFeed};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, ApiResponse, AppState};

pub(super) async fn list_service_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Alert>>>, ApiError> {
    let tree = state
        .client
        .get_service_alerts()
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "service alerts"))?;

    Ok(ApiResponse::new(
        req_id.0,
        normalize_alerts(&tree, AlertKind::Service),
    ))
}

pub(super) async fn list_information_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Alert>>>, ApiError> {
    let tree = state
        .client
        .get_information_alerts()
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "information alerts"))?;

    Ok(ApiResponse::new(
        req_id.0,
        normalize_alerts(&tree, AlertKind::Information),
    ))
}

/// Both alert feeds. The second fetch starts only after the first succeeds,
/// and either failure fails the whole request.
pub(super) async fn list_all_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AllAlerts>>, ApiError> {
    let service = state
        .client
        .get_service_alerts()
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "service alerts"))?;
    let information = state
        .client
        .get_information_alerts()
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "information alerts"))?;

    let data = AllAlerts {
        service_alerts: normalize_alerts(&service, AlertKind::Service),
        information_alerts: normalize_alerts(&information, AlertKind::Information),
    };
    Ok(ApiResponse::new(req_id.0, data))
}

pub(super) async fn list_exceptions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(scope): Path<String>,
) -> Result<Json<ApiResponse<Vec<ServiceException>>>, ApiError> {
    let scope = parse_scope(&scope).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("unknown exception scope '{scope}'; expected train, bus, or all"),
        )
    })?;

    let tree = state
        .client
        .get_exceptions(scope)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "service exceptions"))?;

    Ok(ApiResponse::new(req_id.0, normalize_exceptions(&tree)))
}

pub(super) async fn list_union_departures(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<UnionDeparture>>>, ApiError> {
    let tree = state
        .client
        .get_union_departures()
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "Union departures"))?;

    Ok(ApiResponse::new(req_id.0, normalize_union_departures(&tree)))
}

/// GTFS real-time feeds are returned as upstream sent them.
pub(super) async fn get_realtime_feed(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(feed): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let feed = parse_feed(&feed).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!(
                "unknown feed '{feed}'; expected alerts, trip-updates, or vehicle-positions"
            ),
        )
    })?;

    let tree = state
        .client
        .get_realtime_feed(feed)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "real-time feed"))?;

    Ok(ApiResponse::new(req_id.0, tree))
}

fn parse_scope(raw: &str) -> Option<ExceptionScope> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "train" => Some(ExceptionScope::Train),
        "bus" => Some(ExceptionScope::Bus),
        "all" => Some(ExceptionScope::All),
        _ => None,
    }
}

fn parse_feed(raw: &str) -> Option<RealtimeFeed> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "alerts" => Some(RealtimeFeed::Alerts),
        "trip-updates" => Some(RealtimeFeed::TripUpdates),
        "vehicle-positions" => Some(RealtimeFeed::VehiclePositions),
        _ => None,
    }
}
