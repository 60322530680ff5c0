//! Command execution module
//!
//! This module contains the execution engine.

pub mod executor;

pub use executor::{ExecutionEngine, QueryResult};
