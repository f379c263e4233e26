//! Discord REST error type.
//!
//! Nothing is retried. A failed call is reported to the case engine, which
//! logs it and skips whatever steps depended on it.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A failed Discord REST call.
#[derive(Debug, Error)]
pub struct DiscordApiError {
    /// The operation that failed, e.g. `kick`.
    pub operation: &'static str,

    /// The HTTP status code, if a response arrived.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying transport error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for DiscordApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(
                f,
                "Discord API error during {} (HTTP {}): {}",
                self.operation, code, self.message
            ),
            None => write!(
                f,
                "Discord API error during {}: {}",
                self.operation, self.message
            ),
        }
    }
}

/// Body Discord sends with error statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<u64>,
}

impl DiscordApiError {
    /// A request that never produced a usable response.
    pub fn transport(operation: &'static str, source: reqwest::Error) -> Self {
        Self {
            operation,
            status_code: source.status().map(|s| s.as_u16()),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// A response with a non-success status.
    ///
    /// Discord's JSON error body is used for the message when present.
    pub fn status(operation: &'static str, status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message,
                code: Some(code),
            }) => format!("{message} (code {code})"),
            Ok(ErrorBody { message, code: None }) => message,
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            Err(_) => body.to_string(),
        };
        Self {
            operation,
            status_code: Some(status.as_u16()),
            message,
            source: None,
        }
    }

    /// A success response whose body could not be used.
    pub fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Whether Discord refused the request itself (4xx), as opposed to a
    /// server or transport failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code, Some(400..=499))
    }
}
