//! Error taxonomy for the core.
//!
//! Three families with different handling at the presentation layer: bad user
//! input ([ValidationError]) is a non-fatal warning, persistence failures
//! ([PersistenceError]) are logged while the in-memory state stays
//! authoritative, and OS collaborator failures ([PlatformError]) are surfaced
//! and leave the triggering setting untouched. None of them terminate the
//! process.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected user input. The store performs no mutation when this is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("weight must be a positive number, got {0:?}")]
    InvalidWeight(String),

    #[error("target must be a positive number, got {0:?}")]
    InvalidTarget(String),

    #[error("alarm time must be a 24-hour HH:MM value, got {0:?}")]
    InvalidClockTime(String),

    #[error("opacity must be between 0.1 and 1.0, got {0}")]
    OpacityOutOfRange(f64),
}

/// Best-effort persistence failure.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure in an OS collaborator (startup registration, notification service).
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("autostart registration failed: {0}")]
    Autostart(String),

    #[error("notification delivery failed: {0}")]
    Notification(String),
}

/// Errors a record store can return from a mutating call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("record index {index} is out of bounds (list has {len} records)")]
    OutOfBounds { index: usize, len: usize },
}
