//! Error types shared by the transport, the request pipeline and the resource layer.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Network-level failure reported by a [`Transport`](crate::http::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The reqwest client failed to send the request or read the response.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// Failure reported by a non-reqwest transport.
    #[error("{0}")]
    Connection(String),
}

/// Every failure the client can surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing base URL")]
    MissingBaseUrl,

    #[error("missing API key")]
    MissingApiKey,

    #[error("missing API version")]
    MissingVersion,

    #[error("unsupported API version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The API key contains bytes that are not allowed in a header value.
    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("invalid value {value:?} for {key}")]
    InvalidConfigValue { key: &'static str, value: String },

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Network failure that persisted through every retry attempt.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The whole call, retries included, ran past its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with something other than 200 OK.
    #[error("HTTP {status}{}", status_suffix(.message))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// The server answered 200 OK but the body did not match the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid role name: {0}")]
    InvalidRole(String),
}

fn status_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}

impl Error {
    /// Returns the HTTP status for [`Error::Status`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the retrying transport would have treated this failure as transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Status { status, .. } => status.as_u16() >= 500,
            _ => false,
        }
    }

    /// Whether this error was raised while validating a [`Config`](crate::Config).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::MissingBaseUrl
                | Error::MissingApiKey
                | Error::MissingVersion
                | Error::UnsupportedVersion(_)
                | Error::InvalidBaseUrl(_)
                | Error::InvalidApiKey
                | Error::InvalidConfigValue { .. }
        )
    }
}
