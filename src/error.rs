// src/error.rs

use std::fmt;

/// Client-wide error enum.
/// Centralizes failure handling for everything the session can hit; no
/// variant is fatal to the process, every error is scoped to the action
/// that produced it.
#[derive(Debug)]
pub enum AppError {
    /// Transport-level failure (connection refused, TLS, timeout).
    Network(String),

    /// Non-2xx response. `message` carries the response body text, or
    /// "HTTP <status>" when the body was empty.
    Http { status: u16, message: String },

    /// Client-side pre-flight check failed; no request was issued.
    Validation(String),

    /// Missing or undecodable bearer token.
    Auth(String),

    /// A 2xx response body did not match the expected shape.
    Decode(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "network error: {}", msg),
            AppError::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::Auth(msg) => write!(f, "auth error: {}", msg),
            AppError::Decode(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `reqwest::Error` into the matching `AppError` variant.
/// Allows using the `?` operator on every request.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
