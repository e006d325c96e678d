//! Errors raised while talking to the alias service.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. The body is kept verbatim
    /// since the service's error payloads are not stable.
    #[error("{url} returned {status}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    PageLimit(#[from] crate::pagination::PageLimitExceeded),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status(),
            ApiError::Decode { .. } | ApiError::InvalidUrl(_) | ApiError::PageLimit(_) => None,
        }
    }
}
