// src/error.rs

//! Unified error handling and failure classification.
//!
//! Fetch boundaries turn every failure into an [`AppError`] exactly once.
//! Mutation paths then ask [`is_auth_required`] and [`error_message`] instead
//! of inspecting failure shapes themselves.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Discriminant the backend puts in `code` when a session is required.
pub const AUTH_REQUIRED_CODE: &str = "AUTH_REQUIRED";

/// Message shown when a failure carries nothing displayable.
pub const FALLBACK_MESSAGE: &str = "Something went wrong.";

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The backend refused the call because no user is logged in
    #[error("Authentication required")]
    AuthRequired,

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from a catalog request
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// Non-success status from the backend with a classified message
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// The work record behind a detail view could not be fetched
    #[error("Failed to fetch details for {key}: {message}")]
    DetailFetch { key: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a detail fetch error wrapping the underlying cause.
    pub fn detail_fetch(key: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::DetailFetch {
            key: key.into(),
            message: cause.to_string(),
        }
    }

    /// Classify a backend error body.
    ///
    /// A 401 status or an `AUTH_REQUIRED` body becomes [`AppError::AuthRequired`];
    /// everything else keeps the extracted display message.
    pub fn backend(status: u16, body: &Value) -> Self {
        if status == 401 || is_auth_required_value(body) {
            return Self::AuthRequired;
        }
        Self::Backend {
            status,
            message: error_message_value(body),
        }
    }

    /// True for failures that happened on the wire (transport or status).
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Backend { .. }
        )
    }
}

/// Whether a failure means the user has to log in first.
pub fn is_auth_required(err: &AppError) -> bool {
    matches!(err, AppError::AuthRequired)
}

/// Display text for any failure, falling back to [`FALLBACK_MESSAGE`].
pub fn error_message(err: &AppError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

/// Whether an untyped failure payload carries the auth-required discriminant.
pub fn is_auth_required_value(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("code"))
        .and_then(Value::as_str)
        .is_some_and(|code| code == AUTH_REQUIRED_CODE)
}

/// Normalize an untyped failure payload into a display string.
pub fn error_message_value(value: &Value) -> String {
    let message = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj.get("message").and_then(Value::as_str),
        _ => None,
    };
    match message {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}
