//! MiniSQL - A minimal single-user relational data store
//!
//! This library provides the core components behind the command shell:
//! - Command parsing (CREATE TABLE, INSERT, SELECT, DELETE)
//! - System catalog with an append-only on-disk log
//! - Flat-file record storage with atomic delete rewrite
//! - Command execution

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod sql;
pub mod storage;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use executor::{ExecutionEngine, QueryResult};
