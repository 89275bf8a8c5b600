//! Error types for the record store

use ksg_form::SinkError;
use std::path::PathBuf;

/// Errors during store reads and writes
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error on the store file or its directory
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Malformed comma-separated content
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Content parsed but does not form a table
    #[error("store is corrupt: {reason}")]
    Corrupt {
        /// What was wrong with the content
        reason: String,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create corrupt-store error
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }

    /// Check whether the existing content, rather than the filesystem, is at fault
    #[inline]
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::Csv(_) | Self::Corrupt { .. })
    }
}

impl From<StoreError> for SinkError {
    fn from(err: StoreError) -> Self {
        SinkError::with_source("record store write failed", err)
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_display() {
        let err = StoreError::corrupt("missing header row");
        assert_eq!(err.to_string(), "store is corrupt: missing header row");
        assert!(err.is_content_error());
    }

    #[test]
    fn io_is_not_content_error() {
        let err = StoreError::io(
            "responses.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_content_error());
        assert!(err.to_string().starts_with("io error on responses.csv"));
    }

    #[test]
    fn converts_into_sink_error() {
        let sink: SinkError = StoreError::corrupt("x").into();
        assert!(std::error::Error::source(&sink).is_some());
    }
}
