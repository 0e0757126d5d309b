//! Domain Errors
//!
//! Error types for record validation and store operations.

use std::path::PathBuf;

use thiserror::Error;

/// A field value rejected while building a `MemoryRecord`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Validation error: text must not be empty")]
    EmptyText,

    #[error("Validation error: {field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Validation error: unknown emotion tag '{0}'")]
    UnknownEmotion(String),
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyText => "text",
            Self::OutOfRange { field, .. } => field,
            Self::UnknownEmotion(_) => "emotion",
        }
    }
}

/// The persisted document cannot be read back as a sequence of valid records
#[derive(Debug, Error)]
#[error("Corrupt store {path:?}{}: {reason}", describe_position(.position))]
pub struct CorruptStoreError {
    pub path: PathBuf,
    /// Zero-based index of the first offending record, `None` when the
    /// document as a whole is unreadable
    pub position: Option<usize>,
    pub reason: String,
}

fn describe_position(position: &Option<usize>) -> String {
    match position {
        Some(index) => format!(" (record {})", index),
        None => String::new(),
    }
}

impl CorruptStoreError {
    pub fn document<R: Into<String>>(path: PathBuf, reason: R) -> Self {
        Self {
            path,
            position: None,
            reason: reason.into(),
        }
    }

    pub fn record<R: Into<String>>(path: PathBuf, position: usize, reason: R) -> Self {
        Self {
            path,
            position: Some(position),
            reason: reason.into(),
        }
    }
}

/// Store layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Corrupt(#[from] CorruptStoreError),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
