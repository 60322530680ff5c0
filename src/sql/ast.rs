//! Command AST
//!
//! This module defines the structured form of the four commands (plus EXIT)
//! produced by the [`Parser`](super::Parser).

use std::fmt;

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// CREATE TABLE statement
    CreateTable(CreateTableStatement),
    /// INSERT INTO statement
    Insert(InsertStatement),
    /// SELECT * FROM statement
    Select(SelectStatement),
    /// DELETE FROM statement
    Delete(DeleteStatement),
    /// EXIT - ends the read loop, never reaches the engine
    Exit,
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub table_name: String,
    pub columns: Vec<String>,
}

/// INSERT INTO statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table_name: String,
    pub values: Vec<String>,
}

/// SELECT * FROM statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Everything after FROM, left-trimmed only
    pub table_name: String,
}

/// DELETE FROM statement
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table_name: String,
    pub where_clause: Option<WhereClause>,
}

/// The body of a WHERE clause as written, plus its condition if well-formed
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// Clause text following the WHERE keyword
    pub text: String,
    /// `None` when the text does not contain exactly one `=`
    pub condition: Option<Condition>,
}

/// Single equality predicate `column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: String,
}

impl WhereClause {
    /// Parse a clause body. Whitespace is stripped from both sides of `=`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let condition = if text.matches('=').count() == 1 {
            text.split_once('=').map(|(column, value)| Condition {
                column: strip_whitespace(column),
                value: strip_whitespace(value),
            })
        } else {
            None
        };
        Self { text, condition }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Remove every whitespace character
pub(crate) fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
