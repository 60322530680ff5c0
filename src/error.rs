//! Error types for MiniSQL
//!
//! Every failure a command can hit is one variant of [`Error`]. None of them
//! are fatal to the process: the shell reports the message and keeps reading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for MiniSQL
#[derive(Error, Debug)]
pub enum Error {
    // ========== Parser Errors ==========
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Parse error: unrecognized command '{0}'")]
    UnrecognizedCommand(String),

    #[error("Parse error: invalid WHERE clause '{0}', expected <column> = <value>")]
    InvalidWhereClause(String),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: column '{column}' not found in table '{table}'")]
    ColumnNotFound { column: String, table: String },

    #[error("Catalog error: table '{table}' has {expected} column(s), got {found} value(s)")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    // ========== Storage Errors ==========
    #[error("Storage error: could not open '{}': {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Wrap an I/O failure on `path` as [`Error::StorageUnavailable`]
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for MiniSQL operations
pub type Result<T> = std::result::Result<T, Error>;
