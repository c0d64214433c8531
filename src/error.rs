use std::path::PathBuf;

use thiserror::Error;

/// Startup configuration problems. The only fatal error class.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("{var} is not set (required)")]
    Missing { var: &'static str },

    #[error("Invalid CHECK_INTERVAL_SECONDS \"{input}\" (expected a positive integer)")]
    InvalidInterval { input: String },

    #[error("Invalid {var} \"{input}\" (expected a positive integer)")]
    InvalidTimeout { var: &'static str, input: String },

    #[error("Invalid severity thresholds: borderline ({borderline}) must not exceed pass ({pass})")]
    InvalidThresholds { pass: f64, borderline: f64 },
}

/// The persisted browser session could not be used for this cycle.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("Session file {} not found", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read session file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Session file {} is not valid storage state: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Navigation or page-reading failure. Degrades the cycle to an empty extraction.
#[derive(Debug, Error)]
pub(crate) enum ExtractError {
    #[error("WebDriver {context} failed: {message}")]
    WebDriver {
        context: &'static str,
        message: String,
    },

    #[error("WebDriver transport error: {0}")]
    Http(#[from] ureq::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// A single widget item that could not be turned into a grade record.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ItemParseError {
    #[error("missing {0} element")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub(crate) enum NotifyError {
    #[error("Webhook delivery failed: {0}")]
    Delivery(#[from] ureq::Error),
}

#[derive(Debug, Error)]
pub(crate) enum PersistError {
    #[error("Failed to write history file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reasons a whole cycle was abandoned before reaching `Persisting`.
#[derive(Debug, Error)]
pub(crate) enum CycleError {
    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("Cycle panicked: {0}")]
    Panicked(String),
}
