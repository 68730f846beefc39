use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Local;
use gotransit_core::params::{normalize_time, require_code, time_or_default};
use gotransit_core::{Destination, NextService, ParamError, Stop, StopDetails};
use gotransit_metrolinx::normalize::{
    normalize_destinations, normalize_next_service, normalize_stop_details, normalize_stops,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_param_error, map_upstream_error, ApiError, ApiQuery, ApiResponse, AppState};

/// Upper bound of the destinations window when the caller gives none.
const END_OF_SERVICE_DAY: &str = "2359";

pub(super) async fn list_stops(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Stop>>>, ApiError> {
    let tree = state
        .client
        .get_stops_all()
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "stops"))?;

    Ok(ApiResponse::new(req_id.0, normalize_stops(&tree)))
}

pub(super) async fn get_stop_details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(stop_code): Path<String>,
) -> Result<Json<ApiResponse<StopDetails>>, ApiError> {
    let code = require_code(Some(stop_code.as_str()), "stop_code")
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_stop_details(&code)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, &format!("stop {code}")))?;

    Ok(ApiResponse::new(
        req_id.0,
        normalize_stop_details(&tree, &code),
    ))
}

pub(super) async fn get_next_service(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(stop_code): Path<String>,
) -> Result<Json<ApiResponse<NextService>>, ApiError> {
    let code = require_code(Some(stop_code.as_str()), "stop_code")
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_stop_next_service(&code)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, &format!("stop {code}")))?;

    let now = Local::now().naive_local();
    Ok(ApiResponse::new(
        req_id.0,
        normalize_next_service(&tree, &code, now),
    ))
}

#[derive(Debug, Deserialize)]
pub(super) struct DestinationsQuery {
    pub from_time: Option<String>,
    pub to_time: Option<String>,
}

pub(super) async fn list_destinations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(stop_code): Path<String>,
    ApiQuery(params): ApiQuery<DestinationsQuery>,
) -> Result<Json<ApiResponse<Vec<Destination>>>, ApiError> {
    let (code, from_time, to_time) = destinations_window(&stop_code, &params)
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_stop_destinations(&code, &from_time, &to_time)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, &format!("stop {code}")))?;

    Ok(ApiResponse::new(req_id.0, normalize_destinations(&tree)))
}

/// Resolves the stop code and `HHMM` window: from now until the end of the
/// service day unless the caller narrows it.
fn destinations_window(
    stop_code: &str,
    params: &DestinationsQuery,
) -> Result<(String, String, String), ParamError> {
    let code = require_code(Some(stop_code), "stop_code")?;
    let from_time = time_or_default(params.from_time.as_deref(), Local::now().naive_local())?;
    let to_time = params
        .to_time
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_time)
        .transpose()?
        .unwrap_or_else(|| END_OF_SERVICE_DAY.to_owned());
    Ok((code, from_time, to_time))
}
