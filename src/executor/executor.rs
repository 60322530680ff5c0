//! Command Executor for MiniSQL
//!
//! This module runs parsed commands against the catalog and the record
//! store and reports what happened.

use std::fmt;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogStore, TableDef};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::sql::ast::*;
use crate::sql::parse_command;
use crate::storage::{split_fields, RecordStore};

/// Outcome of a successfully executed command
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// CREATE TABLE finished
    Created { table: String },
    /// INSERT appended one row
    Inserted { table: String },
    /// SELECT scanned the table; raw lines in file order
    Rows { table: String, rows: Vec<String> },
    /// DELETE dropped at least one row
    Deleted {
        table: String,
        clause: Option<String>,
        count: usize,
    },
    /// DELETE ran but no row matched
    NoMatch { table: String },
}

impl QueryResult {
    /// Number of rows written or removed by the command
    pub fn affected_rows(&self) -> usize {
        match self {
            QueryResult::Inserted { .. } => 1,
            QueryResult::Deleted { count, .. } => *count,
            _ => 0,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Created { table } => write!(f, "Table {} created.", table),
            QueryResult::Inserted { table } => write!(f, "Inserted into {}.", table),
            QueryResult::Rows { table, rows } => {
                write!(f, "Data from table {}:", table)?;
                if rows.is_empty() {
                    return write!(f, "\n(no data found)");
                }
                for row in rows {
                    write!(f, "\n{}", row)?;
                }
                Ok(())
            }
            QueryResult::Deleted { table, clause, .. } => match clause {
                Some(clause) => write!(f, "Deleted from {} where {}.", table, clause),
                None => write!(f, "Deleted from {}.", table),
            },
            QueryResult::NoMatch { table } => {
                write!(f, "No matching rows found in table {}.", table)
            }
        }
    }
}

/// How DELETE treats each row
#[derive(Debug, Clone, Copy)]
enum RowFilter<'a> {
    /// No WHERE clause: every row goes
    All,
    /// Drop rows whose value at `index` equals `value`
    Equals { index: usize, value: &'a str },
    /// WHERE names a column the table does not have
    UnknownColumn(&'a str),
    /// WHERE body without exactly one `=`
    Malformed(&'a str),
}

impl<'a> RowFilter<'a> {
    fn new(clause: Option<&'a WhereClause>, columns: &[String]) -> Self {
        let Some(clause) = clause else {
            return RowFilter::All;
        };
        match &clause.condition {
            Some(condition) => match columns.iter().position(|c| *c == condition.column) {
                Some(index) => RowFilter::Equals {
                    index,
                    value: &condition.value,
                },
                None => RowFilter::UnknownColumn(&condition.column),
            },
            None => RowFilter::Malformed(&clause.text),
        }
    }
}

/// Execution Engine
#[derive(Debug)]
pub struct ExecutionEngine {
    config: EngineConfig,
    /// In-memory catalog, loaded once from the log
    catalog: Catalog,
    catalog_store: CatalogStore,
    records: RecordStore,
}

impl ExecutionEngine {
    /// Open an engine on `config`, replaying the catalog log
    pub fn new(config: EngineConfig) -> Result<Self> {
        let catalog_store = CatalogStore::new(config.catalog_path());
        let catalog = catalog_store.load()?;
        let records = RecordStore::from_config(&config);

        Ok(Self {
            config,
            catalog,
            catalog_store,
            records,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse and execute one command line
    pub fn execute_line(&mut self, line: &str) -> Result<QueryResult> {
        let command = parse_command(line)?;
        self.execute(command)
    }

    /// Execute a parsed command
    pub fn execute(&mut self, command: Command) -> Result<QueryResult> {
        debug!(?command, "executing");
        match command {
            Command::CreateTable(stmt) => self.execute_create_table(stmt),
            Command::Insert(stmt) => self.execute_insert(stmt),
            Command::Select(stmt) => self.execute_select(stmt),
            Command::Delete(stmt) => self.execute_delete(stmt),
            // The read loop owns EXIT
            Command::Exit => Err(Error::UnrecognizedCommand("EXIT".to_string())),
        }
    }

    fn execute_create_table(&mut self, stmt: CreateTableStatement) -> Result<QueryResult> {
        let table = TableDef::new(stmt.table_name, stmt.columns);

        // File first, then log, then memory: an error leaves neither half behind
        let created = self.records.create(&table.name)?;
        if let Err(e) = self.catalog_store.append(&table) {
            if created {
                warn!(table = %table.name, "catalog append failed, removing new record file");
                if let Err(cleanup) = self.records.remove(&table.name) {
                    warn!(table = %table.name, error = %cleanup, "could not remove record file");
                }
            }
            return Err(e);
        }

        let name = table.name.clone();
        match self.catalog.register(table) {
            Some(previous) => info!(
                table = %name,
                previous = ?previous.columns,
                "redefined table"
            ),
            None => info!(table = %name, "created table"),
        }

        Ok(QueryResult::Created { table: name })
    }

    fn execute_insert(&mut self, stmt: InsertStatement) -> Result<QueryResult> {
        let InsertStatement { table_name, values } = stmt;

        if self.config.enforce_column_count {
            if let Some(table) = self.catalog.get_table(&table_name) {
                if table.column_count() != values.len() {
                    return Err(Error::ColumnCountMismatch {
                        table: table_name,
                        expected: table.column_count(),
                        found: values.len(),
                    });
                }
            }
        }

        // The record file is the authority on existence here
        self.records.append(&table_name, &values)?;
        Ok(QueryResult::Inserted { table: table_name })
    }

    fn execute_select(&mut self, stmt: SelectStatement) -> Result<QueryResult> {
        let rows = self
            .records
            .scan(&stmt.table_name)?
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryResult::Rows {
            table: stmt.table_name,
            rows,
        })
    }

    fn execute_delete(&mut self, stmt: DeleteStatement) -> Result<QueryResult> {
        let DeleteStatement {
            table_name,
            where_clause,
        } = stmt;

        let filter = RowFilter::new(
            where_clause.as_ref(),
            self.catalog.columns_of(&table_name),
        );

        let pending = self.records.rewrite(&table_name, |line| match filter {
            RowFilter::All => false,
            RowFilter::Equals { index, value } => {
                split_fields(line).get(index).map_or(true, |v| v != value)
            }
            RowFilter::UnknownColumn(_) => true,
            RowFilter::Malformed(clause) => {
                warn!(table = %table_name, row = line, clause, "invalid WHERE clause format, keeping row");
                true
            }
        })?;

        match filter {
            RowFilter::UnknownColumn(column) => {
                pending.discard();
                return Err(Error::ColumnNotFound {
                    column: column.to_string(),
                    table: table_name,
                });
            }
            RowFilter::Malformed(clause) => {
                pending.discard();
                return Err(Error::InvalidWhereClause(clause.to_string()));
            }
            RowFilter::All | RowFilter::Equals { .. } => {}
        }

        let count = pending.dropped();
        pending.commit()?;

        if count == 0 {
            return Ok(QueryResult::NoMatch { table: table_name });
        }

        info!(table = %table_name, rows = count, "deleted rows");
        Ok(QueryResult::Deleted {
            table: table_name,
            clause: where_clause.map(|c| c.text),
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_engine() -> (TempDir, ExecutionEngine) {
        let dir = TempDir::new().unwrap();
        let engine = ExecutionEngine::new(EngineConfig::new().data_dir(dir.path())).unwrap();
        (dir, engine)
    }

    fn select_rows(engine: &mut ExecutionEngine, table: &str) -> Vec<String> {
        match engine.execute_line(&format!("SELECT * FROM {}", table)).unwrap() {
            QueryResult::Rows { rows, .. } => rows,
            other => panic!("Expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_create_table() {
        let (_dir, mut engine) = create_test_engine();

        let result = engine.execute_line("CREATE TABLE users (id, name)").unwrap();
        assert_eq!(result.to_string(), "Table users created.");
        assert_eq!(engine.catalog().columns_of("users"), ["id", "name"]);
        assert!(engine.records().exists("users"));
    }

    #[test]
    fn test_create_table_rolls_back_on_catalog_failure() {
        let (dir, mut engine) = create_test_engine();
        std::fs::create_dir(dir.path().join("catalog.txt")).unwrap();

        let result = engine.execute_line("CREATE TABLE t (a,b)");
        assert!(matches!(result, Err(Error::StorageUnavailable { .. })));
        assert!(!dir.path().join("t.txt").exists());
        assert!(!engine.catalog().table_exists("t"));
    }

    #[test]
    fn test_create_table_failure_keeps_existing_rows() {
        let (dir, mut engine) = create_test_engine();
        std::fs::write(dir.path().join("t.txt"), "1,2\n").unwrap();
        std::fs::create_dir(dir.path().join("catalog.txt")).unwrap();

        let result = engine.execute_line("CREATE TABLE t (a,b)");
        assert!(matches!(result, Err(Error::StorageUnavailable { .. })));
        assert!(!engine.catalog().table_exists("t"));
        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2"]);
    }

    #[test]
    fn test_insert_and_select() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();

        let result = engine.execute_line("INSERT INTO t VALUES (1, 2)").unwrap();
        assert_eq!(result.to_string(), "Inserted into t.");
        assert_eq!(result.affected_rows(), 1);

        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2"]);
    }

    #[test]
    fn test_select_empty_table() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a)").unwrap();

        let result = engine.execute_line("SELECT * FROM t").unwrap();
        assert_eq!(result.to_string(), "Data from table t:\n(no data found)");
    }

    #[test]
    fn test_select_output() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (3,4)").unwrap();

        let result = engine.execute_line("SELECT * FROM t").unwrap();
        assert_eq!(result.to_string(), "Data from table t:\n1,2\n3,4");
    }

    #[test]
    fn test_insert_into_missing_table() {
        let (_dir, mut engine) = create_test_engine();

        let result = engine.execute_line("INSERT INTO ghost VALUES (1)");
        assert!(matches!(result, Err(Error::StorageUnavailable { .. })));
        assert!(!engine.records().exists("ghost"));
    }

    #[test]
    fn test_insert_column_count_lax_by_default() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();

        engine.execute_line("INSERT INTO t VALUES (1)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2,3)").unwrap();
        assert_eq!(select_rows(&mut engine, "t"), vec!["1", "1,2,3"]);
    }

    #[test]
    fn test_insert_column_count_enforced() {
        let dir = TempDir::new().unwrap();
        let config = EngineConfig::new()
            .data_dir(dir.path())
            .enforce_column_count(true);
        let mut engine = ExecutionEngine::new(config).unwrap();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();

        let result = engine.execute_line("INSERT INTO t VALUES (1)");
        assert!(matches!(
            result,
            Err(Error::ColumnCountMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();
        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2"]);
    }

    #[test]
    fn test_delete_with_where() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (3,4)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,5)").unwrap();

        let result = engine.execute_line("DELETE FROM t WHERE a = 1").unwrap();
        assert_eq!(result.to_string(), "Deleted from t where a = 1.");
        assert_eq!(result.affected_rows(), 2);
        assert_eq!(select_rows(&mut engine, "t"), vec!["3,4"]);
    }

    #[test]
    fn test_delete_by_second_column() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (3,4)").unwrap();

        engine.execute_line("delete from t where b=4").unwrap();
        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2"]);
    }

    #[test]
    fn test_delete_no_match() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();

        let result = engine.execute_line("DELETE FROM t WHERE a = 9").unwrap();
        assert_eq!(result, QueryResult::NoMatch { table: "t".to_string() });
        assert_eq!(result.to_string(), "No matching rows found in table t.");
        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2"]);
    }

    #[test]
    fn test_delete_short_rows_are_kept() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (2,x)").unwrap();

        engine.execute_line("DELETE FROM t WHERE b = x").unwrap();
        assert_eq!(select_rows(&mut engine, "t"), vec!["1"]);
    }

    #[test]
    fn test_delete_all() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (3,4)").unwrap();

        let result = engine.execute_line("DELETE FROM t").unwrap();
        assert_eq!(result.to_string(), "Deleted from t.");
        assert_eq!(result.affected_rows(), 2);
        assert!(select_rows(&mut engine, "t").is_empty());
    }

    #[test]
    fn test_delete_unknown_column() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (3,4)").unwrap();

        let result = engine.execute_line("DELETE FROM t WHERE z = 1");
        assert!(matches!(
            result,
            Err(Error::ColumnNotFound { ref column, ref table }) if column == "z" && table == "t"
        ));
        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2", "3,4"]);
    }

    #[test]
    fn test_delete_malformed_where() {
        let (_dir, mut engine) = create_test_engine();
        engine.execute_line("CREATE TABLE t (a, b)").unwrap();
        engine.execute_line("INSERT INTO t VALUES (1,2)").unwrap();

        let result = engine.execute_line("DELETE FROM t WHERE a 1");
        assert!(matches!(result, Err(Error::InvalidWhereClause(ref c)) if c == "a 1"));
        assert_eq!(select_rows(&mut engine, "t"), vec!["1,2"]);
    }

    #[test]
    fn test_delete_missing_table() {
        let (_dir, mut engine) = create_test_engine();
        let result = engine.execute_line("DELETE FROM ghost WHERE a = 1");
        assert!(matches!(result, Err(Error::TableNotFound(_))));
        assert!(!engine.records().exists("ghost"));
    }

    #[test]
    fn test_exit_is_not_executed() {
        let (_dir, mut engine) = create_test_engine();
        assert!(matches!(
            engine.execute(Command::Exit),
            Err(Error::UnrecognizedCommand(_))
        ));
    }
}
