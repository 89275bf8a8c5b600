//! Append-only CSV store of finalized submissions
//!
//! Each append reads the whole table, adds one row and rewrites the file.
//! Appends through one [`CsvStore`] are serialized by a mutex; appends from
//! separate handles or processes are serialized by an exclusive lock on a
//! sidecar `<store>.lock` file. The new content replaces the old file by
//! rename, so readers never see a partial table.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::table::RecordTable;
use fs2::FileExt;
use indexmap::IndexMap;
use ksg_form::{SinkError, Submission, SubmissionSink};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// What an append did to the existing store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendReport {
    /// Data rows in the store after the append
    pub total_rows: usize,
    /// The previous content could not be read and was replaced
    pub replaced_unreadable: bool,
}

/// Persisted table of submissions
#[derive(Debug)]
pub struct CsvStore {
    config: StoreConfig,
    write_lock: Mutex<()>,
}

impl CsvStore {
    /// Create a store handle; the file is created on first append
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Store handle at `path` with default settings otherwise
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::new().with_path(path))
    }

    /// Location of the store file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Name offered for the export download
    #[inline]
    #[must_use]
    pub fn export_file_name(&self) -> &str {
        &self.config.export_file_name
    }

    /// Configured preview size
    #[inline]
    #[must_use]
    pub fn tail_rows(&self) -> usize {
        self.config.tail_rows
    }

    /// Append one finalized record
    ///
    /// Keys unseen so far become new columns; columns the record lacks stay
    /// empty for its row. Unreadable existing content is logged and replaced
    /// so the new record is never dropped.
    pub fn append_record(&self, fields: &IndexMap<String, String>) -> StoreResult<AppendReport> {
        let _guard = self.write_lock.lock();
        let lock = self.lock_file()?;
        lock.lock_exclusive()
            .map_err(|e| StoreError::io(self.lock_path(), e))?;
        let result = self.append_locked(fields);
        if let Err(e) = lock.unlock() {
            tracing::warn!(path = %self.lock_path().display(), error = %e, "store unlock failed");
        }
        result
    }

    fn append_locked(&self, fields: &IndexMap<String, String>) -> StoreResult<AppendReport> {
        let (mut table, replaced_unreadable) = match self.load() {
            Ok(Some(table)) => (table, false),
            Ok(None) => (RecordTable::new(), false),
            Err(e) => {
                tracing::warn!(
                    path = %self.path().display(),
                    error = %e,
                    "existing store unreadable, overwriting with new data"
                );
                (RecordTable::new(), true)
            }
        };

        table.push(fields);
        self.write_atomic(&table)?;
        tracing::info!(
            path = %self.path().display(),
            rows = table.len(),
            columns = table.columns().len(),
            "record appended"
        );
        Ok(AppendReport {
            total_rows: table.len(),
            replaced_unreadable,
        })
    }

    /// The full table; empty when nothing has been stored yet
    pub fn read_all(&self) -> StoreResult<RecordTable> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// The last `n` rows
    pub fn tail(&self, n: usize) -> StoreResult<RecordTable> {
        Ok(self.read_all()?.tail(n))
    }

    /// The full table as comma-separated bytes
    pub fn export_bytes(&self) -> StoreResult<Vec<u8>> {
        self.read_all()?.to_csv_bytes()
    }

    /// Sidecar file holding the cross-process writer lock
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path().as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn lock_file(&self) -> StoreResult<File> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        let path = self.lock_path();
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StoreError::io(path, e))
    }

    fn parent_dir(&self) -> &Path {
        match self.path().parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Existing table, `None` when the file is missing or zero-length
    fn load(&self) -> StoreResult<Option<RecordTable>> {
        let path = self.path();
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        if meta.len() == 0 {
            return Ok(None);
        }
        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        RecordTable::from_csv(BufReader::new(file)).map(Some)
    }

    fn write_atomic(&self, table: &RecordTable) -> StoreResult<()> {
        let path = self.path();
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            table.write_csv(&mut writer)?;
            writer.flush().map_err(|e| StoreError::io(tmp.path(), e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::io(path, e.error))?;
        Ok(())
    }
}

impl SubmissionSink for CsvStore {
    fn append(&self, submission: &Submission) -> Result<(), SinkError> {
        self.append_record(&submission.fields)?;
        Ok(())
    }
}
