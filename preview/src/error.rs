use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Host `{0}` is not allowed. Add it to VITE_ALLOWED_HOSTS to serve it.")]
    HostNotAllowed(String),

    #[error("No proxy target configured for /api")]
    NoProxyTarget,

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Failed to read request body: {0}")]
    Body(axum::BoxError),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreviewError {
    pub fn status(&self) -> StatusCode {
        match self {
            PreviewError::HostNotAllowed(_) => StatusCode::FORBIDDEN,
            PreviewError::NoProxyTarget => StatusCode::NOT_FOUND,
            PreviewError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            PreviewError::Body(_) => StatusCode::BAD_REQUEST,
            PreviewError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PreviewError::Client(_) | PreviewError::Bind { .. } | PreviewError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn reqwest_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err()
    }

    #[test]
    fn client_setup_failure_is_internal_not_gateway() {
        assert_eq!(
            PreviewError::Client(reqwest_error()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(PreviewError::Upstream(reqwest_error()).status(), StatusCode::BAD_GATEWAY);
        assert!(
            PreviewError::Client(reqwest_error())
                .to_string()
                .starts_with("Failed to build HTTP client")
        );
    }

    #[test]
    fn oversized_body_is_payload_too_large() {
        let err = PreviewError::PayloadTooLarge(16);
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "Request body exceeds 16 bytes");
        assert_eq!(
            PreviewError::Body("connection reset".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
