//! HTTP client for the Metrolinx Open Data API.
//!
//! Every endpoint is a read-only GET addressed purely by path segments, with
//! the shared access key appended as a `key` query parameter. Responses are
//! returned as untyped JSON trees; shaping them is the job of
//! [`crate::normalize`]. There is no retry and no caching: any transport or
//! status failure reaches the caller unchanged.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::MetrolinxError;

/// Which schedule exceptions to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionScope {
    Train,
    Bus,
    All,
}

impl ExceptionScope {
    fn segment(self) -> &'static str {
        match self {
            Self::Train => "Train",
            Self::Bus => "Bus",
            Self::All => "All",
        }
    }
}

/// Vehicle fleet for the in-service listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fleet {
    Buses,
    Trains,
    Upx,
}

impl Fleet {
    fn segment(self) -> &'static str {
        match self {
            Self::Buses => "Buses",
            Self::Trains => "Trains",
            Self::Upx => "UPX",
        }
    }
}

/// GTFS real-time feeds exposed upstream as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeFeed {
    Alerts,
    TripUpdates,
    VehiclePositions,
}

impl RealtimeFeed {
    fn segment(self) -> &'static str {
        match self {
            Self::Alerts => "Alerts",
            Self::TripUpdates => "TripUpdates",
            Self::VehiclePositions => "VehiclePosition",
        }
    }
}

/// Client for the Metrolinx Open Data API.
///
/// Use [`MetrolinxClient::builder`] to tune timeouts and the user agent, or
/// [`MetrolinxClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct MetrolinxClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for MetrolinxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetrolinxClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl MetrolinxClient {
    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`MetrolinxError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MetrolinxError::InvalidBaseUrl`] if
    /// `base_url` cannot carry path segments.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, MetrolinxError> {
        Self::builder(api_key, base_url)
            .timeout_secs(timeout_secs)
            .build()
    }

    /// Starts a builder for callers that need to tune timeouts or the user agent.
    #[must_use]
    pub fn builder(api_key: &str, base_url: &str) -> MetrolinxClientBuilder {
        MetrolinxClientBuilder {
            api_key: api_key.to_owned(),
            base_url: base_url.to_owned(),
            timeout_secs: 10,
            connect_timeout_secs: 10,
            user_agent: "gotransit/0.1 (transit-proxy)".to_owned(),
        }
    }

    // ----- stops ---------------------------------------------------------

    /// `Stop/All`: every stop and station.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_stops_all(&self) -> Result<Value, MetrolinxError> {
        self.fetch(&["Stop", "All"]).await
    }

    /// `Stop/NextService/{code}`: predictions for every line serving a stop.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_stop_next_service(&self, stop_code: &str) -> Result<Value, MetrolinxError> {
        self.fetch(&["Stop", "NextService", stop_code]).await
    }

    /// `Stop/Details/{code}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_stop_details(&self, stop_code: &str) -> Result<Value, MetrolinxError> {
        self.fetch(&["Stop", "Details", stop_code]).await
    }

    /// `Stop/Destinations/{code}/{from}/{to}`; times are `HHMM`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_stop_destinations(
        &self,
        stop_code: &str,
        from_time: &str,
        to_time: &str,
    ) -> Result<Value, MetrolinxError> {
        self.fetch(&["Stop", "Destinations", stop_code, from_time, to_time])
            .await
    }

    // ----- schedules -----------------------------------------------------

    /// `Schedule/Journey/{date}/{from}/{to}/{time}/{max}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_journey(
        &self,
        date: &str,
        from_stop_code: &str,
        to_stop_code: &str,
        start_time: &str,
        max_journeys: u32,
    ) -> Result<Value, MetrolinxError> {
        let max = max_journeys.to_string();
        self.fetch(&[
            "Schedule",
            "Journey",
            date,
            from_stop_code,
            to_stop_code,
            start_time,
            &max,
        ])
        .await
    }

    /// `Schedule/Line/All/{date}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_lines_all(&self, date: &str) -> Result<Value, MetrolinxError> {
        self.fetch(&["Schedule", "Line", "All", date]).await
    }

    /// `Schedule/Line/{date}/{line}/{direction}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_line_schedule(
        &self,
        date: &str,
        line_code: &str,
        direction: &str,
    ) -> Result<Value, MetrolinxError> {
        self.fetch(&["Schedule", "Line", date, line_code, direction])
            .await
    }

    /// `Schedule/Line/Stop/{date}/{line}/{direction}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_line_stops(
        &self,
        date: &str,
        line_code: &str,
        direction: &str,
    ) -> Result<Value, MetrolinxError> {
        self.fetch(&["Schedule", "Line", "Stop", date, line_code, direction])
            .await
    }

    /// `Schedule/Trip/{date}/{trip}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_trip_schedule(
        &self,
        date: &str,
        trip_number: &str,
    ) -> Result<Value, MetrolinxError> {
        self.fetch(&["Schedule", "Trip", date, trip_number]).await
    }

    // ----- fares ---------------------------------------------------------

    /// `Fares/{from}/{to}` or `Fares/{from}/{to}/{day}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_fares(
        &self,
        from_stop_code: &str,
        to_stop_code: &str,
        operational_day: Option<&str>,
    ) -> Result<Value, MetrolinxError> {
        match operational_day {
            Some(day) => {
                self.fetch(&["Fares", from_stop_code, to_stop_code, day])
                    .await
            }
            None => self.fetch(&["Fares", from_stop_code, to_stop_code]).await,
        }
    }

    // ----- service updates -----------------------------------------------

    /// `ServiceUpdate/ServiceAlert/All`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_service_alerts(&self) -> Result<Value, MetrolinxError> {
        self.fetch(&["ServiceUpdate", "ServiceAlert", "All"]).await
    }

    /// `ServiceUpdate/InformationAlert/All`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_information_alerts(&self) -> Result<Value, MetrolinxError> {
        self.fetch(&["ServiceUpdate", "InformationAlert", "All"])
            .await
    }

    /// `ServiceUpdate/UnionDepartures/All`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_union_departures(&self) -> Result<Value, MetrolinxError> {
        self.fetch(&["ServiceUpdate", "UnionDepartures", "All"])
            .await
    }

    /// `ServiceUpdate/Exceptions/{Train|Bus|All}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_exceptions(&self, scope: ExceptionScope) -> Result<Value, MetrolinxError> {
        self.fetch(&["ServiceUpdate", "Exceptions", scope.segment()])
            .await
    }

    /// `ServiceataGlance/{Buses|Trains|UPX}/All`: trips currently in service.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_in_service(&self, fleet: Fleet) -> Result<Value, MetrolinxError> {
        self.fetch(&["ServiceataGlance", fleet.segment(), "All"])
            .await
    }

    /// `Gtfs/Feed/{Alerts|TripUpdates|VehiclePosition}`.
    ///
    /// # Errors
    ///
    /// See [`MetrolinxClient::fetch`].
    pub async fn get_realtime_feed(&self, feed: RealtimeFeed) -> Result<Value, MetrolinxError> {
        self.fetch(&["Gtfs", "Feed", feed.segment()]).await
    }

    // ----- transport -----------------------------------------------------

    /// Issues one GET for `segments` and parses the body as a JSON tree.
    ///
    /// # Errors
    ///
    /// - [`MetrolinxError::NotFound`] on HTTP 404 or an in-band 404 error code.
    /// - [`MetrolinxError::UpstreamStatus`] on any other non-2xx status or
    ///   in-band 4xx/5xx error code.
    /// - [`MetrolinxError::Http`] on network failure or timeout.
    /// - [`MetrolinxError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch(&self, segments: &[&str]) -> Result<Value, MetrolinxError> {
        let endpoint = segments.join("/");
        let url = self.build_url(segments);
        tracing::debug!(endpoint = %endpoint, "metrolinx request");

        // reqwest errors embed the request URL, which carries the key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MetrolinxError::NotFound { endpoint });
        }
        if !status.is_success() {
            return Err(MetrolinxError::UpstreamStatus {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let tree: Value = serde_json::from_str(&body).map_err(|e| MetrolinxError::Deserialize {
            context: endpoint.clone(),
            source: e,
        })?;

        Self::check_metadata(&tree, endpoint)?;
        Ok(tree)
    }

    /// Builds the request URL: base path, then each percent-encoded segment,
    /// then the `key` query parameter.
    fn build_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Cannot-be-a-base URLs are rejected by the builder.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    /// Upstream sometimes answers 200 and reports the real outcome in
    /// `Metadata.ErrorCode`. Codes outside 4xx/5xx are treated as success.
    fn check_metadata(tree: &Value, endpoint: String) -> Result<(), MetrolinxError> {
        let code = tree
            .get("Metadata")
            .and_then(|m| m.get("ErrorCode"))
            .and_then(|c| match c {
                Value::String(s) => s.trim().parse::<u16>().ok(),
                Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                _ => None,
            });

        match code {
            Some(404) => Err(MetrolinxError::NotFound { endpoint }),
            Some(status @ 400..=599) => Err(MetrolinxError::UpstreamStatus { status, endpoint }),
            _ => Ok(()),
        }
    }
}

/// Builder for [`MetrolinxClient`].
#[derive(Debug, Clone)]
pub struct MetrolinxClientBuilder {
    api_key: String,
    base_url: String,
    timeout_secs: u64,
    connect_timeout_secs: u64,
    user_agent: String,
}

impl MetrolinxClientBuilder {
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        user_agent.clone_into(&mut self.user_agent);
        self
    }

    /// # Errors
    ///
    /// Returns [`MetrolinxError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`MetrolinxError::InvalidBaseUrl`] for a base URL that
    /// does not parse or cannot carry path segments.
    pub fn build(self) -> Result<MetrolinxClient, MetrolinxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .user_agent(&self.user_agent)
            .build()?;

        let base_url = Url::parse(self.base_url.trim_end_matches('/'))
            .map_err(|e| MetrolinxError::InvalidBaseUrl(format!("'{}': {e}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(MetrolinxError::InvalidBaseUrl(format!(
                "'{}' cannot carry path segments",
                self.base_url
            )));
        }

        Ok(MetrolinxClient {
            client,
            api_key: self.api_key,
            base_url,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
