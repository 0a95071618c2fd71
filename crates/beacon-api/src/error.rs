//! REST client error types.

use thiserror::Error;

/// Errors surfaced by the marketplace REST client.
///
/// Every variant carries the endpoint path so log lines read without
/// extra context.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    /// The request never completed (connect failure, timeout).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint path.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// The endpoint the failure relates to, when known.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Build(_) => None,
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = ApiError::Status {
            endpoint: "/notifications".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "/notifications returned status 503");
        assert_eq!(err.endpoint(), Some("/notifications"));
    }

    #[test]
    fn error_is_std_error() {
        let err = ApiError::Status {
            endpoint: "/invites/count".into(),
            status: 500,
        };
        let _: &dyn std::error::Error = &err;
    }
}
