//! Engine configuration
//!
//! Describes where the catalog log and the per-table record files live.

use std::path::{Path, PathBuf};

/// Default catalog log file name
pub const DEFAULT_CATALOG_FILE: &str = "catalog.txt";

/// Default suffix for per-table record files
pub const DEFAULT_TABLE_EXTENSION: &str = "txt";

/// Storage layout and policy for an [`ExecutionEngine`](crate::executor::ExecutionEngine)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the catalog log and record files
    pub data_dir: PathBuf,
    /// Catalog log file name, relative to `data_dir`
    pub catalog_file: String,
    /// Suffix for record files (`<table>.<ext>`)
    pub table_extension: String,
    /// Reject INSERTs whose value count differs from the table's column count
    pub enforce_column_count: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            table_extension: DEFAULT_TABLE_EXTENSION.to_string(),
            enforce_column_count: false,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the catalog log file name
    pub fn catalog_file(mut self, name: impl Into<String>) -> Self {
        self.catalog_file = name.into();
        self
    }

    /// Set the record file suffix
    pub fn table_extension(mut self, ext: impl Into<String>) -> Self {
        self.table_extension = ext.into();
        self
    }

    /// Toggle value-count checking on INSERT
    pub fn enforce_column_count(mut self, enforce: bool) -> Self {
        self.enforce_column_count = enforce;
        self
    }

    /// Full path of the catalog log
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }
}
