use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One returned row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

/// Rows returned by a single statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
    affected_rows: u64,
}

impl ResultSet {
    pub const fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            affected_rows: 0,
        }
    }

    /// Result of a write statement, which carries no rows.
    pub const fn affected(affected_rows: u64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows,
        }
    }

    /// Column names; empty when the statement returned no rows.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub const fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column across all rows, skipping rows that lack it.
    pub fn pluck(&self, column: &str) -> Vec<&Value> {
        self.rows.iter().filter_map(|row| row.get(column)).collect()
    }
}

/// Result sets of a batch, in statement order, with a cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiResultSet {
    sets: Vec<ResultSet>,
    cursor: usize,
}

impl MultiResultSet {
    pub const fn new(sets: Vec<ResultSet>) -> Self {
        Self { sets, cursor: 0 }
    }

    /// The set under the cursor, if the batch has not been exhausted.
    pub fn current(&self) -> Option<&ResultSet> {
        self.sets.get(self.cursor)
    }

    /// Moves the cursor forward; returns false once past the last set.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.sets.len() {
            self.cursor += 1;
        }
        self.cursor < self.sets.len()
    }

    pub fn stored(&self) -> &[ResultSet] {
        &self.sets
    }

    pub fn into_sets(self) -> Vec<ResultSet> {
        self.sets
    }

    /// Number of result sets in the batch.
    pub fn count(&self) -> usize {
        self.sets.len()
    }
}
