use thiserror::Error;

use crate::types::SourceKind;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("{source_kind} request to {url} failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Network {
        source_kind: SourceKind,
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{source_kind} request to {url} timed out")]
    Timeout { source_kind: SourceKind, url: String },

    #[error("Malformed {source_kind} response: {message}")]
    MalformedResponse {
        source_kind: SourceKind,
        message: String,
    },

    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinderError {
    /// Short stable tag used in logs and HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FinderError::Network { .. } => "network",
            FinderError::Timeout { .. } => "timeout",
            FinderError::MalformedResponse { .. } => "malformed_response",
            FinderError::ConfigurationMissing(_) => "configuration_missing",
            FinderError::MissingField(_) => "missing_field",
            FinderError::InvalidInput(_) => "invalid_input",
            FinderError::Config(_) | FinderError::Toml(_) => "config",
            FinderError::Json(_) => "json",
            FinderError::Io(_) => "io",
        }
    }

    /// HTTP status of a failed request, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FinderError::Network { status, .. } => *status,
            _ => None,
        }
    }

    pub fn malformed(source_kind: SourceKind, message: impl Into<String>) -> Self {
        FinderError::MalformedResponse {
            source_kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
