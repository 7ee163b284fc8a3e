use reqwest::StatusCode;
use thiserror::Error;

/// Message used when a non-2xx response body cannot be parsed as the
/// backend's `{error, message}` envelope.
pub const FALLBACK_MESSAGE: &str = "server error";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request exceeded the client's configured timeout. Kept separate
    /// from [`ApiError::Network`] so callers can tell the two apart.
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(reqwest::Error),
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    /// Classifies a reqwest failure, promoting timeouts to their own variant.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for HTTP 4xx responses, the class that is never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Server { status, .. } if status.is_client_error())
    }

    /// The human-readable message surfaced to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
