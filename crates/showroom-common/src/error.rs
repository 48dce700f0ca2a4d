//! Common error types used throughout showroom.
//!
//! Every failure a request can run into maps onto one variant here. Route
//! handlers turn these into `{message, error}` responses; the status code
//! comes from [`Error::http_status`].

use serde_json::{json, Value};

/// Common error type for showroom.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field or file was missing, or an input was malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stored public URL could not be mapped back onto a bucket path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The uploaded bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The object store rejected or failed a call.
    ///
    /// `payload` is the upstream error body, forwarded to clients untouched.
    #[error("Storage error: {message}")]
    Storage { message: String, payload: Value },

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new InvalidUrl error.
    pub fn invalid_url<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a Storage error whose payload is just the message.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        let message = msg.into();
        let payload = json!({ "message": message });
        Self::Storage { message, payload }
    }

    /// Create a Storage error carrying the upstream response body.
    pub fn storage_with_payload<S: Into<String>>(msg: S, payload: Value) -> Self {
        Self::Storage {
            message: msg.into(),
            payload,
        }
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidUrl(_) => 400,
            Self::NotFound(_) => 404,
            Self::Decode(_)
            | Self::Storage { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Whether this error came from one of the remote collaborators
    /// (object store or database).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Database(_))
    }

    /// The value forwarded in the `error` field of a response body.
    pub fn payload(&self) -> Value {
        match self {
            Self::Storage { payload, .. } => payload.clone(),
            Self::Database(msg) => json!({ "message": msg }),
            other => Value::String(other.to_string()),
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
