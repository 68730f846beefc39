use axum::{
    extract::State,
    Extension, Json,
};
use chrono::{Local, NaiveDateTime};
use gotransit_core::params::{
    clamp_max_journeys, date_or_default, optional_date, require_code, time_or_default,
};
use gotransit_core::{FareResponse, JourneyResponse, ParamError};
use gotransit_metrolinx::normalize::{normalize_fares, normalize_journey, FareQuery, JourneyQuery};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_param_error, map_upstream_error, ApiError, ApiQuery, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct JourneyParams {
    pub from_stop: Option<String>,
    pub to_stop: Option<String>,
    pub journey_date: Option<String>,
    pub start_time: Option<String>,
    pub max_journeys: Option<u32>,
}

/// A journey search with every parameter resolved to its upstream form.
#[derive(Debug, PartialEq, Eq)]
struct JourneySearch {
    from_stop: String,
    to_stop: String,
    date: String,
    start_time: String,
    max_journeys: u32,
}

impl JourneySearch {
    fn resolve(params: &JourneyParams, now: NaiveDateTime) -> Result<Self, ParamError> {
        Ok(Self {
            from_stop: require_code(params.from_stop.as_deref(), "from_stop")?,
            to_stop: require_code(params.to_stop.as_deref(), "to_stop")?,
            date: date_or_default(params.journey_date.as_deref(), now)?,
            start_time: time_or_default(params.start_time.as_deref(), now)?,
            max_journeys: clamp_max_journeys(params.max_journeys),
        })
    }
}

pub(super) async fn plan_journey(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<JourneyParams>,
) -> Result<Json<ApiResponse<JourneyResponse>>, ApiError> {
    let search = JourneySearch::resolve(&params, Local::now().naive_local())
        .map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_journey(
            &search.date,
            &search.from_stop,
            &search.to_stop,
            &search.start_time,
            search.max_journeys,
        )
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "journeys"))?;

    let data = normalize_journey(
        &tree,
        &JourneyQuery {
            from_stop: &search.from_stop,
            to_stop: &search.to_stop,
            date: &search.date,
            start_time: &search.start_time,
        },
    );
    Ok(ApiResponse::new(req_id.0, data))
}

#[derive(Debug, Deserialize)]
pub(super) struct FareParams {
    pub from_stop: Option<String>,
    pub to_stop: Option<String>,
    pub operational_day: Option<String>,
}

pub(super) async fn get_fares(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<FareParams>,
) -> Result<Json<ApiResponse<FareResponse>>, ApiError> {
    let resolve = || -> Result<_, ParamError> {
        Ok((
            require_code(params.from_stop.as_deref(), "from_stop")?,
            require_code(params.to_stop.as_deref(), "to_stop")?,
            optional_date(params.operational_day.as_deref())?,
        ))
    };
    let (from_stop, to_stop, operational_day) =
        resolve().map_err(|e| map_param_error(req_id.0.clone(), &e))?;

    let tree = state
        .client
        .get_fares(&from_stop, &to_stop, operational_day.as_deref())
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e, "fares"))?;

    let data = normalize_fares(
        &tree,
        &FareQuery {
            from_stop: &from_stop,
            to_stop: &to_stop,
            operational_day: operational_day.as_deref(),
        },
    );
    Ok(ApiResponse::new(req_id.0, data))
}
