//! Storage engine module
//!
//! This module contains the flat-file storage components:
//! - Row encoding
//! - Per-table record files

pub mod record;
pub mod row;

pub use record::{PendingRewrite, RecordStore, RowScan};
pub use row::{join_fields, split_fields, Row, DELIMITER};
