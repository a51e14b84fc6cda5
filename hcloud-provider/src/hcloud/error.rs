//! Provider API error types.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the provider API client, passed on unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with an error status.
    #[error("provider rejected request ({status} {code}): {message}")]
    Provider {
        status: u16,
        code: String,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("cannot decode provider response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    /// Build a `not_found` provider error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::Provider {
            status: 404,
            code: "not_found".to_string(),
            message: message.into(),
        }
    }

    /// Build the error for a non-success response from its status and raw body.
    ///
    /// Hetzner Cloud wraps errors as `{"error": {"code": .., "message": ..}}`;
    /// anything else keeps the raw body as the message.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => ApiError::Provider {
                status,
                code: parsed.error.code,
                message: parsed.error.message,
            },
            Err(_) => ApiError::Provider {
                status,
                code: String::new(),
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    /// True when the provider reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Provider { status, code, .. } => code == "not_found" || *status == 404,
            _ => false,
        }
    }
}
