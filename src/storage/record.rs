//! Record store for MiniSQL
//!
//! Each table owns one flat text file, `<table>.<ext>`, holding one row per
//! line. Rows are appended on INSERT, scanned on SELECT and filtered through
//! [`RecordStore::rewrite`] on DELETE. Every call opens and closes its own
//! file handle.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::row::join_fields;
use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Per-table append-only row files under one directory
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Directory where record files live
    data_dir: PathBuf,
    /// Record file suffix
    extension: String,
}

impl RecordStore {
    pub fn new(data_dir: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.data_dir, config.table_extension.clone())
    }

    /// Path of the backing file for `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", table, self.extension))
    }

    /// Check whether `table` has a backing file
    pub fn exists(&self, table: &str) -> bool {
        self.table_path(table).is_file()
    }

    /// Create an empty backing file for `table`.
    ///
    /// An existing file is left as it is. Returns `true` when this call
    /// created the file.
    pub fn create(&self, table: &str) -> Result<bool> {
        let path = self.table_path(table);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!(path = %path.display(), "created record file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "record file already present, keeping rows");
                Ok(false)
            }
            Err(e) => Err(Error::storage(path, e)),
        }
    }

    /// Delete the backing file for `table`
    pub fn remove(&self, table: &str) -> Result<()> {
        let path = self.table_path(table);
        fs::remove_file(&path).map_err(|e| Error::storage(path, e))
    }

    /// Append one row as a delimited line.
    ///
    /// The file is never created here: a table without a backing file fails
    /// with [`Error::StorageUnavailable`].
    pub fn append<S: AsRef<str>>(&self, table: &str, values: &[S]) -> Result<()> {
        let path = self.table_path(table);
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| Error::storage(&path, e))?;

        writeln!(file, "{}", join_fields(values)).map_err(|e| Error::storage(&path, e))?;
        debug!(path = %path.display(), values = values.len(), "appended row");
        Ok(())
    }

    /// Open a lazy scan over the raw lines of `table`.
    ///
    /// Each call starts a fresh scan from the first row.
    pub fn scan(&self, table: &str) -> Result<RowScan> {
        let path = self.table_path(table);
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::TableNotFound(table.to_string()),
            _ => Error::storage(&path, e),
        })?;
        Ok(RowScan {
            lines: BufReader::new(file).lines(),
        })
    }

    /// Copy every row for which `keep` holds into a temporary file next to
    /// the original.
    ///
    /// Nothing touches the original file until [`PendingRewrite::commit`].
    /// Dropping the returned value discards the temporary file.
    pub fn rewrite<F>(&self, table: &str, mut keep: F) -> Result<PendingRewrite>
    where
        F: FnMut(&str) -> bool,
    {
        let rows = self.scan(table)?;
        let target = self.table_path(table);

        let mut temp = tempfile::Builder::new()
            .prefix(&format!("temp_{}", table))
            .suffix(".tmp")
            .tempfile_in(&self.data_dir)
            .map_err(|e| Error::storage(&self.data_dir, e))?;
        debug!(temp = %temp.path().display(), "opened rewrite output");

        // The replacement keeps the original file's mode
        let permissions = fs::metadata(&target)
            .map_err(|e| Error::storage(&target, e))?
            .permissions();
        fs::set_permissions(temp.path(), permissions)
            .map_err(|e| Error::storage(temp.path(), e))?;

        let mut kept = 0;
        let mut dropped = 0;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            for line in rows {
                let line = line?;
                if keep(&line) {
                    writeln!(writer, "{}", line).map_err(|e| Error::storage(&target, e))?;
                    kept += 1;
                } else {
                    dropped += 1;
                }
            }
            writer.flush().map_err(|e| Error::storage(&target, e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| Error::storage(&target, e))?;

        Ok(PendingRewrite {
            temp,
            target,
            kept,
            dropped,
        })
    }
}

/// Lazy iterator over the physical lines of a record file
#[derive(Debug)]
pub struct RowScan {
    lines: Lines<BufReader<File>>,
}

impl Iterator for RowScan {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|line| line.map_err(Error::IoError))
    }
}

/// Filtered copy of a record file waiting to replace the original
#[derive(Debug)]
pub struct PendingRewrite {
    temp: NamedTempFile,
    target: PathBuf,
    kept: usize,
    dropped: usize,
}

impl PendingRewrite {
    /// Rows written to the new file
    pub fn kept(&self) -> usize {
        self.kept
    }

    /// Rows filtered out
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Atomically replace the original file with the filtered copy.
    ///
    /// On failure the temporary file is removed and the original stays the
    /// file of record.
    pub fn commit(self) -> Result<()> {
        let Self { temp, target, .. } = self;
        temp.persist(&target)
            .map_err(|e| Error::storage(&target, e.error))?;
        debug!(path = %target.display(), "replaced record file");
        Ok(())
    }

    /// Throw the filtered copy away, leaving the original untouched
    pub fn discard(self) {
        debug!(path = %self.target.display(), "discarded rewrite output");
    }
}
