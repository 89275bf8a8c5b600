//! Store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default store file, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "responses.csv";

/// Default file name offered for the export download
pub const DEFAULT_EXPORT_FILE_NAME: &str = "ksheersagar_survey_responses.csv";

/// Rows shown in the confirmation page preview
pub const DEFAULT_TAIL_ROWS: usize = 5;

/// Where the store lives and how it is exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the comma-separated store file
    pub path: PathBuf,
    /// File name offered for the full export
    pub export_file_name: String,
    /// Number of most recent rows in the preview
    pub tail_rows: usize,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With store path
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// With preview row count
    #[inline]
    #[must_use]
    pub fn with_tail_rows(mut self, rows: usize) -> Self {
        self.tail_rows = rows;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            tail_rows: DEFAULT_TAIL_ROWS,
        }
    }
}
