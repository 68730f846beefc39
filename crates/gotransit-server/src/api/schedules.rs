use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Local;
use gotransit_core::params::{date_or_default, require_code};
use gotransit_core::{Line, LineSchedule, LineStop, ParamError, TripSchedule};
use gotransit_metrolinx::normalize::{
    normalize_line_schedule, normalize_line_stops, normalize_lines, normalize_trip_schedule,
};
use gotransit_metrolinx::Fleet;
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_param_error, map_upstream_error, ApiError, ApiQuery, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ScheduleDateQuery {
    pub schedule_date: Option<String>,
}

impl ScheduleDateQuery {
    /// The requested service date as `YYYYMMDD`, today when omitted.
    fn date(&self) -> Result<String, ParamError> {
        date_or_default(self.schedule_date.as_deref(), Local::now().naive_local())
    }
}

pub(super) async fn list_lines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<ScheduleDateQuery>,
) -> Result<Json<ApiResponse<Vec<Line>>>, ApiError> {
    let date = params
        .date()
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_lines_all(&date)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, &format!("lines for {date}")))?;

    Ok(ApiResponse::new(req_id.0, normalize_lines(&tree)))
}

pub(super) async fn get_line_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((line_code, direction)): Path<(String, String)>,
    ApiQuery(params): ApiQuery<ScheduleDateQuery>,
) -> Result<Json<ApiResponse<LineSchedule>>, ApiError> {
    let (line, dir, date) = line_request(&line_code, &direction, &params)
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_line_schedule(&date, &line, &dir)
        .await
        .map_err(|e| {
            map_upstream_error(
                req_id.0.clone(),
                &e,
                &format!("line {line} {dir} for {date}"),
            )
        })?;

    Ok(ApiResponse::new(
        req_id.0,
        normalize_line_schedule(&tree, &line, &dir, &date),
    ))
}

pub(super) async fn list_line_stops(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((line_code, direction)): Path<(String, String)>,
    ApiQuery(params): ApiQuery<ScheduleDateQuery>,
) -> Result<Json<ApiResponse<Vec<LineStop>>>, ApiError> {
    let (line, dir, date) = line_request(&line_code, &direction, &params)
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_line_stops(&date, &line, &dir)
        .await
        .map_err(|e| {
            map_upstream_error(
                req_id.0.clone(),
                &e,
                &format!("stops for line {line} {dir} on {date}"),
            )
        })?;

    Ok(ApiResponse::new(req_id.0, normalize_line_stops(&tree)))
}

pub(super) async fn get_trip_schedule(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(trip_number): Path<String>,
    ApiQuery(params): ApiQuery<ScheduleDateQuery>,
) -> Result<Json<ApiResponse<TripSchedule>>, ApiError> {
    let (trip, date) = require_code(Some(trip_number.as_str()), "trip_number")
        .and_then(|trip| Ok((trip, params.date()?)))
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_trip_schedule(&date, &trip)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, &format!("trip {trip} on {date}")))?;

    Ok(ApiResponse::new(
        req_id.0,
        normalize_trip_schedule(&tree, &trip, &date),
    ))
}

/// Trips currently in service, returned as upstream sent them.
pub(super) async fn list_in_service(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(fleet): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let fleet = parse_fleet(&fleet).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("unknown fleet '{fleet}'; expected buses, trains, or upx"),
        )
    })?;

    let tree = state
        .client
        .get_in_service(fleet)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "in-service trips"))?;

    Ok(ApiResponse::new(req_id.0, tree))
}

fn line_request(
    line_code: &str,
    direction: &str,
    params: &ScheduleDateQuery,
) -> Result<(String, String, String), ParamError> {
    Ok((
        require_code(Some(line_code), "line_code")?,
        require_code(Some(direction), "direction")?,
        params.date()?,
    ))
}

fn parse_fleet(raw: &str) -> Option<Fleet> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "buses" => Some(Fleet::Buses),
        "trains" => Some(Fleet::Trains),
        "upx" => Some(Fleet::Upx),
        _ => None,
    }
}
