//! Error type shared by the REST client and the editor controllers

use serde_json::Value;
use std::fmt;

/// Everything that can go wrong between a user action and the server.
///
/// Cloneable so the same failure can sit in a controller's status and be
/// handed back to the caller of `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Detected locally before any request was made (bad or unknown uniqname)
    Validation(String),

    /// HTTP 400 with the field messages flattened into one string
    BadRequest(String),

    /// Any other non-2xx response
    Http { status: u16, status_text: String },

    /// The request did not complete before the configured deadline
    Timeout,

    /// The server could not be reached
    Transport(String),

    /// The response body did not have the expected shape
    Decode(String),

    /// The queue was returned in its visitor form, so the caller is not a host
    NotHost(u64),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// True for errors raised before contacting the server
    pub fn is_local(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    /// Classify a reqwest error
    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(message) => write!(f, "{}", message),
            ApiError::BadRequest(message) => write!(f, "{}", message),
            ApiError::Http { status_text, .. } => write!(f, "{}", status_text),
            ApiError::Timeout => write!(f, "The server took too long to respond"),
            ApiError::Transport(message) => write!(f, "Could not reach the server: {}", message),
            ApiError::Decode(message) => write!(f, "Unexpected response from the server: {}", message),
            ApiError::NotHost(queue_id) => write!(f, "You are not a host of queue {}", queue_id),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::from_reqwest_error(&error)
    }
}

/// Flatten a 400 body (`{"field": ["message", ...], ...}`) into one message.
///
/// Messages keep the key order of the response body and are joined with
/// newlines. String values count as a single message; anything else falls
/// back to its JSON text. Returns `None` when the body is not an object.
pub fn flatten_field_errors(body: &Value) -> Option<String> {
    let fields = body.as_object()?;

    let mut messages = Vec::new();
    for value in fields.values() {
        match value {
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::String(message) => messages.push(message.clone()),
                        other => messages.push(other.to_string()),
                    }
                }
            }
            Value::String(message) => messages.push(message.clone()),
            other => messages.push(other.to_string()),
        }
    }

    Some(messages.join("\n"))
}
