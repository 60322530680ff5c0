//! Persisted catalog log
//!
//! Every CREATE TABLE appends one line `name,col1,col2,...` to the log.
//! The log is never compacted, so replay lets later lines for a name win.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::catalog::Catalog;
use super::schema::TableDef;
use crate::error::{Error, Result};

/// Append-only catalog log on disk
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay the log into a fresh catalog. A missing log is an empty catalog.
    pub fn load(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no catalog log, starting empty");
                return Ok(catalog);
            }
            Err(e) => return Err(Error::storage(&self.path, e)),
        };

        let mut entries = 0;
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            match TableDef::from_line(&line) {
                Some(table) => {
                    catalog.register(table);
                    entries += 1;
                }
                None => warn!(line = lineno + 1, "skipping catalog entry without a table name"),
            }
        }

        info!(
            path = %self.path.display(),
            entries,
            tables = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Append one definition to the end of the log
    pub fn append(&self, table: &TableDef) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::storage(&self.path, e))?;

        writeln!(file, "{}", table.to_line()).map_err(|e| Error::storage(&self.path, e))?;
        debug!(table = %table.name, "appended catalog entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(name: &str, columns: &[&str]) -> TableDef {
        TableDef::new(name, columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_load_missing_log() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.txt"));

        let catalog = store.load().unwrap();
        assert!(catalog.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_append_and_reload() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.txt"));

        store.append(&table("t", &["a", "b"])).unwrap();
        store.append(&table("u", &["x"])).unwrap();

        let catalog = store.load().unwrap();
        assert_eq!(catalog.columns_of("t"), ["a", "b"]);
        assert_eq!(catalog.columns_of("u"), ["x"]);
    }

    #[test]
    fn test_last_definition_wins() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.txt"));

        store.append(&table("t", &["a", "b"])).unwrap();
        store.append(&table("t", &["c", "d"])).unwrap();

        let catalog = store.load().unwrap();
        assert_eq!(catalog.columns_of("t"), ["c", "d"]);

        // The log itself keeps both lines
        let log = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(log, "t,a,b\nt,c,d\n");
    }

    #[test]
    fn test_load_skips_nameless_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.txt");
        std::fs::write(&path, "\n,a\nt,a\n").unwrap();

        let catalog = CatalogStore::new(&path).load().unwrap();
        assert_eq!(catalog.list_tables(), vec!["t"]);
    }
}
