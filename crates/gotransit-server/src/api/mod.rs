mod alerts;
mod journeys;
mod schedules;
mod stops;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use gotransit_core::ParamError;
use gotransit_metrolinx::{MetrolinxClient, MetrolinxError};
use serde::{de::DeserializeOwned, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub client: MetrolinxClient,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
    #[serde(skip)]
    upstream_status: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
            upstream_status: None,
        }
    }

    /// An upstream failure answered with upstream's own status code.
    fn upstream(request_id: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            upstream_status: Some(status),
            ..Self::new(request_id, "upstream_error", message)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => self
                .upstream_status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translates an accessor failure into the caller-facing error for `resource`.
pub(super) fn map_upstream_error(
    request_id: String,
    error: &MetrolinxError,
    resource: &str,
) -> ApiError {
    match error {
        MetrolinxError::NotFound { endpoint } => {
            tracing::warn!(endpoint = %endpoint, "upstream resource not found");
            ApiError::new(request_id, "not_found", format!("{resource} not found"))
        }
        MetrolinxError::UpstreamStatus { status, endpoint } => {
            tracing::warn!(status, endpoint = %endpoint, "upstream returned an error status");
            ApiError::upstream(
                request_id,
                *status,
                format!("upstream returned status {status} for {resource}"),
            )
        }
        MetrolinxError::Http(e) => {
            tracing::error!(error = %e, timeout = e.is_timeout(), "upstream request failed");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                format!("upstream request for {resource} failed"),
            )
        }
        MetrolinxError::Deserialize { context, source } => {
            tracing::error!(context = %context, error = %source, "upstream response was not JSON");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                format!("upstream returned an unreadable response for {resource}"),
            )
        }
        MetrolinxError::InvalidBaseUrl(_) => {
            tracing::error!(error = %error, "upstream client misconfigured");
            ApiError::new(request_id, "internal_error", "upstream client misconfigured")
        }
    }
}

/// [`Query`] whose rejection is reported in the standard error body.
pub(super) struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                let request_id = parts
                    .extensions
                    .get::<RequestId>()
                    .map(|id| id.0.clone())
                    .unwrap_or_default();
                Err(ApiError::new(
                    request_id,
                    "validation_error",
                    rejection.body_text(),
                ))
            }
        }
    }
}

pub(super) fn map_param_error(request_id: String, error: &ParamError) -> ApiError {
    ApiError::new(request_id, "validation_error", error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/stops", get(stops::list_stops))
        .route("/api/stops/{stop_code}/details", get(stops::get_stop_details))
        .route(
            "/api/stops/{stop_code}/next-service",
            get(stops::get_next_service),
        )
        .route(
            "/api/stops/{stop_code}/destinations",
            get(stops::list_destinations),
        )
        .route("/api/journeys", get(journeys::plan_journey))
        .route("/api/journeys/fares", get(journeys::get_fares))
        .route("/api/alerts/service", get(alerts::list_service_alerts))
        .route(
            "/api/alerts/information",
            get(alerts::list_information_alerts),
        )
        .route("/api/alerts/all", get(alerts::list_all_alerts))
        .route(
            "/api/alerts/exceptions/{scope}",
            get(alerts::list_exceptions),
        )
        .route(
            "/api/alerts/union/departures",
            get(alerts::list_union_departures),
        )
        .route("/api/alerts/feeds/{feed}", get(alerts::get_realtime_feed))
        .route("/api/schedules/lines", get(schedules::list_lines))
        .route(
            "/api/schedules/lines/{line_code}/{direction}",
            get(schedules::get_line_schedule),
        )
        .route(
            "/api/schedules/lines/{line_code}/{direction}/stops",
            get(schedules::list_line_stops),
        )
        .route(
            "/api/schedules/trips/{trip_number}",
            get(schedules::get_trip_schedule),
        )
        .route(
            "/api/schedules/in-service/{fleet}",
            get(schedules::list_in_service),
        )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api_router())
        .fallback(unknown_route)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn unknown_route(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "not_found", "no such route")
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::new(req_id.0, HealthData { status: "ok" })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
