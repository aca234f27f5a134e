use crate::{Result, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
}

/// A live, forward-only cursor over query results.
///
/// Single-use: it is never rewound, a restart always means re-executing the
/// query and obtaining a new source. Must be closed exactly once, either
/// after being fully drained or on early abandonment.
pub trait RowSource {
    /// Whether another row can be fetched.
    fn has_more(&self) -> bool;

    /// Fetch the next row, or `None` when the source is exhausted.
    fn fetch_row(&mut self) -> Result<Option<RowLabeled>>;

    /// Driver-reported total row count, `None` when the driver cannot
    /// report one. Never a silent zero.
    fn row_count(&self) -> Option<u64>;

    /// Release the underlying cursor.
    fn close(&mut self) -> Result<()>;
}
