//! System Catalog for MiniSQL
//!
//! In-memory registry of table definitions, keyed by table name.

use indexmap::IndexMap;

use super::schema::TableDef;
use crate::error::{Error, Result};

/// System Catalog - maps table names to their definitions
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Table definitions by name, in first-definition order
    tables: IndexMap<String, TableDef>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any earlier one with the same name.
    /// Returns the replaced definition.
    pub fn register(&mut self, table: TableDef) -> Option<TableDef> {
        self.tables.insert(table.name.clone(), table)
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Column list for `name`, empty when the table is not registered
    pub fn columns_of(&self, name: &str) -> &[String] {
        self.get_table(name).map(TableDef::columns).unwrap_or(&[])
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// List all table names
    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Get table schema info as a formatted string (for .schema command)
    pub fn table_info(&self, name: &str) -> Result<String> {
        let table = self
            .get_table(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;

        let mut info = format!("Table: {}\n", table.name());
        info.push_str("Columns:\n");
        for (position, column) in table.columns().iter().enumerate() {
            info.push_str(&format!("  {} {}\n", position, column));
        }
        Ok(info)
    }
}
