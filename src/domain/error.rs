use std::io;

use thiserror::Error;

/// Generic text shown for any failed submission or fetch.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Text shown when required fields are left empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

/// Library-wide error type for onair operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration values failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    ConfigMissing(String),

    /// Backend request failed at the transport level or returned a non-success status.
    #[error("Backend request failed: {message}")]
    Http { message: String, status: Option<u16> },

    /// Input rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required form fields were left empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Local key-value store failure.
    #[error("Local storage error: {0}")]
    Storage(String),

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    Parse { what: String, details: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Content resource name not recognised.
    #[error("Unknown content resource '{name}'. Available: {available}")]
    UnknownResource { name: String, available: String },
}

impl AppError {
    pub fn http<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::Http { message: message.into(), status }
    }

    /// HTTP status attached to the failure, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Short human-readable text for the UI layer.
    ///
    /// Transport failures, rejected responses and local faults all collapse onto
    /// the same generic message; only missing required fields get their own text.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::MissingFields(_) => MISSING_FIELDS_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Provide an `io::ErrorKind`-like view for callers mapping to exit codes.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::InvalidConfig(_)
            | AppError::Validation(_)
            | AppError::MissingFields(_)
            | AppError::Parse { .. }
            | AppError::TomlParse(_)
            | AppError::Json(_)
            | AppError::UnknownResource { .. } => io::ErrorKind::InvalidInput,
            AppError::ConfigMissing(_) => io::ErrorKind::NotFound,
            AppError::Http { .. } | AppError::Storage(_) => io::ErrorKind::Other,
        }
    }
}
