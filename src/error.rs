use thiserror::Error;

/// Every way a page fetch can fail.
///
/// The set is closed: transport outcomes that fit nowhere else land in
/// `TransportFailure`, statuses outside 400..=599 in `ClientOrServerError`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("search request could not be constructed")]
    InvalidRequest,

    #[error("no response reached the client")]
    TransportFailure,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("server responded with status {0}")]
    ClientOrServerError(u16),

    #[error("server responded without a body")]
    EmptyBody,

    #[error("response body did not match the expected shape")]
    MalformedResponse,
}

impl SearchError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            code => Self::ClientOrServerError(code),
        }
    }

    /// Stable identifier used in logs and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::TransportFailure => "transport_failure",
            Self::RateLimited => "rate_limited",
            Self::ClientOrServerError(_) => "client_or_server_error",
            Self::EmptyBody => "empty_body",
            Self::MalformedResponse => "malformed_response",
        }
    }

    /// Human-readable message for the presentation layer.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidRequest => "The URL is invalid. Please contact support.".to_string(),
            Self::TransportFailure => {
                "No internet connection. Please check your network and try again.".to_string()
            }
            Self::RateLimited => {
                "You have exceeded the request limit. Please wait a few minutes and try again."
                    .to_string()
            }
            Self::ClientOrServerError(status) => status_message(*status),
            Self::EmptyBody => {
                "No data was received from the server. Please try again later.".to_string()
            }
            Self::MalformedResponse => {
                "There was a problem processing the server's response. Please try again."
                    .to_string()
            }
        }
    }
}

fn status_message(status: u16) -> String {
    match status {
        400 => "The search request was rejected as malformed. Please adjust your query.".to_string(),
        401 => "The access key was rejected. Please check the API configuration.".to_string(),
        403 => "Access to the photo service is forbidden. Please check your permissions.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        500 => "The photo service encountered an internal error. Please try again later."
            .to_string(),
        502 | 503 => "The photo service is temporarily unavailable. Please try again later."
            .to_string(),
        code => format!(
            "Server returned an error with status code {}. Please try again later.",
            code
        ),
    }
}

/// Failure reading or writing persisted query history.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history storage error: {0}")]
    Storage(String),

    #[error("history serialization error: {0}")]
    Serialization(String),
}
