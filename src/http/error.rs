//! Request-path error taxonomy and the mapping to HTTP responses.
//!
//! Handlers return [`ApiError`]; its `IntoResponse` impl picks the status and
//! JSON body and tags the response with a [`MappedError`] extension. The
//! lifecycle guard reads that tag to log the failure once, or to drop it
//! quietly when the request was already answered.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::facts::FactError;

pub const TIMEOUT_MESSAGE: &str = "Request timed out";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Failures that can end a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request deadline elapsed before a handler responded.
    #[error("request deadline elapsed")]
    Timeout,

    /// The outbound fact call failed.
    #[error(transparent)]
    Upstream(#[from] FactError),

    /// The handler panicked or vanished without producing a response.
    #[error("handler failed: {0}")]
    Handler(String),
}

/// Coarse classification used for status selection and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Internal,
}

/// Marker attached to responses produced from an [`ApiError`].
#[derive(Debug, Clone)]
pub struct MappedError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::Upstream(_) | ApiError::Handler(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Timeout => TIMEOUT_MESSAGE,
            ErrorKind::Internal => INTERNAL_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mapped = MappedError {
            kind: self.kind(),
            message: self.to_string(),
        };
        let mut response = (
            self.status(),
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response();
        response.extensions_mut().insert(mapped);
        response
    }
}

/// Log a mapped failure that is about to reach the client.
pub fn report(request_id: &str, failure: &MappedError) {
    tracing::error!(
        request_id = %request_id,
        kind = ?failure.kind,
        error = %failure.message,
        "Error caught"
    );
}
