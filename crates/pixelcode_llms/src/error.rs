//! Error types shared by every provider.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by providers, the orchestrator and the refinement controller.
///
/// Provider failures are never swallowed: status codes and provider ids are kept so the
/// caller can decide whether to retry or fall back to another provider.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing API key for provider: {0}")]
    MissingApiKey(String),

    #[error("API key for provider {0} contains characters that cannot be sent in a header")]
    InvalidApiKey(String),

    #[error("{provider} rejected the API key ({status}): {body}")]
    Unauthorized {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} reported an error: {message}")]
    Provider { provider: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} request timed out after {}s", after.as_secs())]
    Timeout { provider: String, after: Duration },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Refinement finished {passes} pass(es) without a response")]
    ProtocolExhausted { passes: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Credential,
    InvalidInput,
    Transport,
    StreamParse,
    ProtocolExhausted,
}

impl Error {
    /// Build the error for a non-2xx HTTP status.
    pub fn from_status(provider: impl Into<String>, status: StatusCode, body: String) -> Self {
        let provider = provider.into();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
                provider,
                status: status.as_u16(),
                body,
            },
            _ => Error::Api {
                provider,
                status: status.as_u16(),
                body,
            },
        }
    }

    pub fn stream_error(message: impl Into<String>) -> Self {
        Error::Stream(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Error::InvalidResponse(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub fn provider_error(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingApiKey(_) | Error::InvalidApiKey(_) | Error::Unauthorized { .. } => {
                ErrorKind::Credential
            }
            Error::InvalidImage(_) | Error::InvalidInput(_) | Error::Io(_) => {
                ErrorKind::InvalidInput
            }
            Error::Api { .. } | Error::Provider { .. } | Error::Http(_) | Error::Timeout { .. } => {
                ErrorKind::Transport
            }
            Error::Stream(_) | Error::InvalidResponse(_) | Error::Json(_) => ErrorKind::StreamParse,
            Error::ProtocolExhausted { .. } => ErrorKind::ProtocolExhausted,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::Unauthorized { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether a caller-side retry has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
