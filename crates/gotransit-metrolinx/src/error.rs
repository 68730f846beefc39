use thiserror::Error;

/// Errors returned by the Metrolinx Open Data API client.
#[derive(Debug, Error)]
pub enum MetrolinxError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered 404, either as the HTTP status or in its metadata block.
    #[error("upstream resource not found: {endpoint}")]
    NotFound { endpoint: String },

    /// Upstream answered with any other non-success status.
    #[error("unexpected upstream status {status} from {endpoint}")]
    UpstreamStatus { status: u16, endpoint: String },

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
