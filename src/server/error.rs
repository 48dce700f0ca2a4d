//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<_, ApiError>`. Every error body has the shape
//! `{"message": ..., "error": ...}` where `error` is optional and, for
//! storage and database failures, carries the upstream error untouched.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use showroom_common::Error;

/// Message used when the failure is not attributable to a collaborator.
pub const SERVER_ERROR: &str = "Server error";

/// An error response ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    /// 400 with `message` and no detail.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 with `message` and no detail.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Map `err` to a response, using `context` as the message for failures
    /// that the caller names (upstream calls, unmappable URLs).
    ///
    /// Validation and not-found errors keep their own message. Decode, I/O
    /// and internal failures become a generic 500.
    pub fn from_error(err: Error, context: &str) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err {
            Error::Validation(msg) | Error::NotFound(msg) => Self::new(status, msg),
            Error::InvalidUrl(_) => Self::new(status, context),
            Error::Storage { .. } | Error::Database(_) => {
                let payload = err.payload();
                Self::new(status, context).with_error(payload)
            }
            Error::Decode(_) | Error::Io(_) | Error::Internal(_) => {
                Self::new(status, SERVER_ERROR).with_error(Value::String(err.to_string()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                message = %self.message,
                error = ?self.error,
                "Request failed"
            );
        } else {
            tracing::warn!(status = %self.status, message = %self.message, "Request rejected");
        }

        let body = ErrorBody {
            message: &self.message,
            error: self.error.as_ref(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Attach a route-specific message to a fallible result.
pub trait OrRespond<T> {
    fn or_respond(self, context: &str) -> Result<T, ApiError>;
}

impl<T> OrRespond<T> for showroom_common::Result<T> {
    fn or_respond(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_error(e, context))
    }
}
