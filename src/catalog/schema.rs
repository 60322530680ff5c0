//! Table definitions for MiniSQL
//!
//! A table is a name plus an ordered list of column names. There are no
//! column types: every value is an opaque text token.

use crate::storage::row::{join_fields, split_fields};

/// Table definition - name and ordered column list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    /// Table name
    pub name: String,
    /// Ordered column names
    pub columns: Vec<String>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column called `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Encode as a catalog log line: `name,col1,col2,...`
    pub fn to_line(&self) -> String {
        let mut line = self.name.clone();
        if !self.columns.is_empty() {
            line.push(',');
            line.push_str(&join_fields(&self.columns));
        }
        line
    }

    /// Decode a catalog log line. Returns `None` when the name is empty.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut fields = split_fields(line).into_iter();
        let name = fields.next().filter(|n| !n.is_empty())?;
        Some(Self::new(name, fields.collect()))
    }
}
