//! Non-`SELECT` helper statements and the parsed `SHOW META` block.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::SphinxQL;
use crate::result::{ResultSet, Row};

pub struct Helper;

impl Helper {
    /// Statistics of the previous query on the same connection.
    pub fn show_meta() -> SphinxQL {
        SphinxQL::raw("SHOW META")
    }

    pub fn show_status() -> SphinxQL {
        SphinxQL::raw("SHOW STATUS")
    }
}

/// Parsed `SHOW META` output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMeta {
    /// Rows the daemon returned to the client.
    pub total: u64,
    /// Documents matched in the index, independent of `LIMIT`.
    pub total_found: u64,
    /// Query time in seconds.
    pub time: f64,
    pub variables: BTreeMap<String, String>,
}

impl SearchMeta {
    pub fn from_result(set: &ResultSet) -> Self {
        Self::from_rows(set.rows())
    }

    pub fn from_rows(rows: &[Row]) -> Self {
        let variables: BTreeMap<String, String> = rows
            .iter()
            .filter_map(|row| {
                let name = row.get("Variable_name").or_else(|| row.get("Counter"))?;
                let value = row.get("Value")?;
                Some((value_text(name), value_text(value)))
            })
            .collect();

        let parse_u64 = |key: &str| {
            variables
                .get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or_default()
        };

        Self {
            total: parse_u64("total"),
            total_found: parse_u64("total_found"),
            time: variables
                .get("time")
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or_default(),
            variables,
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
