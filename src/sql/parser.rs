//! Command Parser
//!
//! Recognizes one command per line. Keywords match case-insensitively,
//! identifiers and values are kept exactly as written. After the command
//! prefix, each shape extracts its arguments by position:
//!
//! - `CREATE TABLE t (c1, c2)`: the next whitespace-delimited token is the
//!   table name, columns sit between the first `(` and the first `)` after it.
//! - `INSERT INTO t VALUES (v1, v2)`: the table name is whatever lies between
//!   `INTO` and `VALUES` with whitespace removed.
//! - `SELECT * FROM t`: everything after `FROM`, left-trimmed only.
//! - `DELETE FROM t [WHERE col = val]`: next token, then an optional clause.

use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till1, take_until};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{all_consuming, value};
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

use super::ast::*;
use crate::error::{Error, Result};
use crate::storage::row::{split_fields, DELIMITER};

const VALUES_KEYWORD: &str = "VALUES";
const WHERE_KEYWORD: &str = "WHERE";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Keyword {
    CreateTable,
    InsertInto,
    SelectFrom,
    DeleteFrom,
    Exit,
}

/// Command line parser
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a new parser over a single command line
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the line into a [`Command`]
    pub fn parse(&self) -> Result<Command> {
        let line = self.input.trim_start();
        let (rest, keyword) = command_keyword(line)
            .map_err(|_| Error::UnrecognizedCommand(line.trim_end().to_string()))?;

        match keyword {
            Keyword::CreateTable => parse_create_table(rest).map(Command::CreateTable),
            Keyword::InsertInto => parse_insert(rest).map(Command::Insert),
            Keyword::SelectFrom => Ok(Command::Select(parse_select(rest))),
            Keyword::DeleteFrom => parse_delete(rest).map(Command::Delete),
            Keyword::Exit => Ok(Command::Exit),
        }
    }
}

/// Parse a single command line
pub fn parse_command(input: &str) -> Result<Command> {
    Parser::new(input).parse()
}

fn command_keyword(input: &str) -> IResult<&str, Keyword> {
    alt((
        value(
            Keyword::CreateTable,
            tuple((tag_no_case("CREATE"), multispace1, tag_no_case("TABLE"))),
        ),
        value(
            Keyword::InsertInto,
            tuple((tag_no_case("INSERT"), multispace1, tag_no_case("INTO"))),
        ),
        value(
            Keyword::SelectFrom,
            tuple((
                tag_no_case("SELECT"),
                multispace1,
                char('*'),
                multispace1,
                tag_no_case("FROM"),
            )),
        ),
        value(
            Keyword::DeleteFrom,
            tuple((tag_no_case("DELETE"), multispace1, tag_no_case("FROM"))),
        ),
        value(
            Keyword::Exit,
            all_consuming(terminated(tag_no_case("EXIT"), multispace0)),
        ),
    ))(input)
}

/// Whitespace-separated identifier following the command prefix
fn identifier(input: &str) -> IResult<&str, &str> {
    preceded(multispace1, take_till1(|c: char| c.is_whitespace()))(input)
}

/// Text between the first `(` and the first `)` after it
fn paren_list(input: &str) -> IResult<&str, &str> {
    preceded(
        take_until("("),
        delimited(char('('), take_until(")"), char(')')),
    )(input)
}

/// Comma-separated tokens with all whitespace removed from each
fn list_items(inner: &str) -> Vec<String> {
    split_fields(inner)
        .iter()
        .map(|item| strip_whitespace(item))
        .collect()
}

/// Case-insensitive byte offset of `keyword` in `haystack`
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    haystack.to_ascii_uppercase().find(keyword)
}

fn parse_create_table(rest: &str) -> Result<CreateTableStatement> {
    let (after_name, table_name) = identifier(rest)
        .map_err(|_| Error::ParseError("CREATE TABLE: missing table name".to_string()))?;
    // The catalog log is comma-delimited, so such a name would not reload
    if table_name.contains(DELIMITER) {
        return Err(Error::ParseError(format!(
            "CREATE TABLE: table name '{}' must not contain '{}'",
            table_name, DELIMITER
        )));
    }
    let (_, columns) = paren_list(after_name).map_err(|_| {
        Error::ParseError(format!(
            "CREATE TABLE {}: expected column list (col1,col2,...)",
            table_name
        ))
    })?;

    Ok(CreateTableStatement {
        table_name: table_name.to_string(),
        columns: list_items(columns),
    })
}

fn parse_insert(rest: &str) -> Result<InsertStatement> {
    let values_pos = find_keyword(rest, VALUES_KEYWORD).ok_or_else(|| {
        Error::ParseError(
            "invalid INSERT syntax, expected INSERT INTO <table> VALUES (v1,v2,...)".to_string(),
        )
    })?;

    let table_name = strip_whitespace(&rest[..values_pos]);
    if table_name.is_empty() {
        return Err(Error::ParseError("INSERT: missing table name".to_string()));
    }

    let invalid_values =
        || Error::ParseError("invalid VALUES syntax, expected (v1,v2,...)".to_string());
    let (_, values) =
        paren_list(&rest[values_pos + VALUES_KEYWORD.len()..]).map_err(|_| invalid_values())?;
    if values.is_empty() {
        return Err(invalid_values());
    }

    Ok(InsertStatement {
        table_name,
        values: list_items(values),
    })
}

fn parse_select(rest: &str) -> SelectStatement {
    // Right side stays as typed: trailing characters become part of the name
    SelectStatement {
        table_name: rest.trim_start().to_string(),
    }
}

fn parse_delete(rest: &str) -> Result<DeleteStatement> {
    let (after_name, table_name) = identifier(rest)
        .map_err(|_| Error::ParseError("DELETE FROM: missing table name".to_string()))?;

    let where_clause = find_keyword(after_name, WHERE_KEYWORD).map(|pos| {
        let body = &after_name[pos + WHERE_KEYWORD.len()..];
        WhereClause::new(body.trim())
    });

    Ok(DeleteStatement {
        table_name: table_name.to_string(),
        where_clause,
    })
}
