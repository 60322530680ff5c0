//! Command language module
//!
//! This module contains the command AST and the line parser.

pub mod ast;
pub mod parser;

pub use ast::{
    Command, Condition, CreateTableStatement, DeleteStatement, InsertStatement, SelectStatement,
    WhereClause,
};
pub use parser::{parse_command, Parser};
