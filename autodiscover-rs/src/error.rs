//! Error types for autodiscover-rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

/// Result type alias for autodiscover operations
pub type Result<T> = std::result::Result<T, AutodiscoverError>;

/// Autodiscover error types
#[derive(Error, Debug)]
pub enum AutodiscoverError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request used a method the endpoint does not serve
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Request body could not be read
    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// Request body is not a usable Autodiscover document
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Response document could not be composed
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl AutodiscoverError {
    /// HTTP status reported to the client for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMethod(_) | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::BodyRead(_) | Self::Render(_) | Self::Config(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AutodiscoverError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            warn!("{}", self);
        } else {
            error!("{}", self);
        }

        // Never echo request content back to the client
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let err = AutodiscoverError::UnsupportedMethod("GET".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AutodiscoverError::MalformedRequest("unexpected EOF".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_map_to_internal_error() {
        let err = AutodiscoverError::BodyRead("connection reset".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AutodiscoverError::Render(askama::Error::Fmt(std::fmt::Error));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_has_empty_body() {
        let err = AutodiscoverError::MalformedRequest("<script>".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
