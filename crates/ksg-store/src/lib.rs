//! Ksheersagar record store
//!
//! Durable, append-only table of finalized survey submissions.
//!
//! # Format
//!
//! UTF-8, comma-separated, one header row. The header is the union of every
//! key ever submitted (`submission_id` included); each submission is one row
//! and cells it did not supply are empty. Dates are `YYYY-MM-DD`, times
//! `HH:MM:SS`.
//!
//! # Example
//!
//! ```rust,no_run
//! use ksg_store::{CsvStore, StoreConfig};
//!
//! # fn example() -> Result<(), ksg_store::StoreError> {
//! let store = CsvStore::new(StoreConfig::new().with_path("responses.csv"));
//! let preview = store.tail(store.tail_rows())?;
//! println!("{} recent rows", preview.len());
//! let bytes = store.export_bytes()?;
//! std::fs::write(store.export_file_name(), bytes).ok();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod table;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use store::{AppendReport, CsvStore};
pub use table::RecordTable;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
