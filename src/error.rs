// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single call to the chatbot endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The endpoint could not be reached, timed out, or the body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Chatbot returned {status}: {body}")]
    Protocol { status: StatusCode, body: String },

    /// The response body did not match the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Message cannot be empty")]
    EmptyMessage,
}

impl ChatError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }

    /// Status code of a protocol failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid base URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Base URL '{0}' must be an absolute http(s) URL without query or fragment")]
    UnsupportedUrl(String),

    #[error("Invalid value '{value}' for {key}: expected whole seconds")]
    InvalidSeconds { key: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    Transport(#[from] reqwest::Error),
}
