//! Error type for Deal Engine requests.

/// Failure of a single Deal Engine exchange. Nothing here is retried; the caller
/// decides what to surface.
#[derive(Debug, thiserror::Error)]
pub enum DealError {
    /// Base URL or endpoint could not be turned into a request URL.
    #[error("failed to create request: invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Curl rejected a request option (header, timeout, URL).
    #[error("failed to create request: {0}")]
    Request(#[source] curl::Error),
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("failed to send request: {0}")]
    Transport(#[source] curl::Error),
    /// Any status other than 200.
    #[error("unexpected response status: {code} {reason}")]
    Status { code: u32, reason: String },
    /// Response headers arrived but the body transfer failed.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] curl::Error),
    /// Response claimed JSON but did not parse.
    #[error("failed to parse JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DealError {
    /// HTTP status code, if the server answered with a non-200 status.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            DealError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
