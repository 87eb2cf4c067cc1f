//! MySQL-protocol driver backed by a lazily connecting `sqlx` pool.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::{Number, Value};
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Decode, Either, Row as _, TypeInfo, ValueRef};

use crate::connection::Connection;
use crate::error::{Result, SphinxQlError};
use crate::result::{MultiResultSet, ResultSet, Row};

pub const DEFAULT_PORT: u16 = 9306;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub charset: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            charset: "utf8".to_string(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MySqlConnection {
    pool: MySqlPool,
    endpoint: String,
}

impl MySqlConnection {
    /// Builds the pool without opening a socket; the first statement connects.
    ///
    /// # Panics
    ///
    /// The pool spawns its maintenance task here, which panics outside a
    /// Tokio runtime.
    pub fn connect_lazy(params: &ConnectParams) -> Self {
        // The daemon rejects the sql_mode and time_zone session setup that a
        // MySQL server expects, so only SET NAMES is left enabled.
        let mut options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .charset(&params.charset)
            .pipes_as_concat(false)
            .no_engine_substitution(false)
            .timezone(None::<String>);
        if let Some(username) = &params.username {
            options = options.username(username);
        }
        if let Some(password) = &params.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(params.max_connections)
            .acquire_timeout(params.connect_timeout)
            .connect_lazy_with(options);

        Self {
            pool,
            endpoint: format!("{}:{}", params.host, params.port),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn run(&self, sql: &str) -> Result<Vec<ResultSet>> {
        tracing::debug!(endpoint = %self.endpoint, statement = %sql, "executing sphinxql");

        let mut stream = sqlx::raw_sql(sql).fetch_many(&self.pool);
        let mut collector = ResultCollector::default();

        while let Some(step) = stream.try_next().await.map_err(SphinxQlError::from_driver)? {
            match step {
                Either::Right(row) => {
                    let decoded = decode_row(&row)?;
                    collector.row(|| column_names(&row), decoded);
                }
                Either::Left(done) => collector.done(done.rows_affected()),
            }
        }

        let sets = collector.finish();
        tracing::debug!(endpoint = %self.endpoint, sets = sets.len(), "sphinxql complete");
        Ok(sets)
    }
}

/// Splits the driver's interleaved row and completion steps into one result
/// set per statement.
///
/// Column names are taken from the first row of each statement, so a
/// statement that matched nothing yields a set without columns.
#[derive(Debug, Default)]
struct ResultCollector {
    sets: Vec<ResultSet>,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultCollector {
    fn row(&mut self, columns: impl FnOnce() -> Vec<String>, row: Row) {
        if self.rows.is_empty() {
            self.columns = columns();
        }
        self.rows.push(row);
    }

    fn done(&mut self, rows_affected: u64) {
        if self.rows.is_empty() {
            self.sets.push(ResultSet::affected(rows_affected));
        } else {
            self.sets.push(ResultSet::new(
                std::mem::take(&mut self.columns),
                std::mem::take(&mut self.rows),
            ));
        }
    }

    fn finish(mut self) -> Vec<ResultSet> {
        if !self.rows.is_empty() {
            self.sets.push(ResultSet::new(self.columns, self.rows));
        }
        self.sets
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    async fn query(&self, sql: &str) -> Result<ResultSet> {
        Ok(self.run(sql).await?.into_iter().next().unwrap_or_default())
    }

    async fn multi_query(&self, statements: &[String]) -> Result<MultiResultSet> {
        let sql = statements.join("; ");
        let mut sets = self.run(&sql).await?;
        // Statements that produced nothing on the wire still get a slot.
        sets.resize_with(statements.len().max(sets.len()), ResultSet::default);
        Ok(MultiResultSet::new(sets))
    }
}

fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut decoded = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name().to_string();
        let raw = row.try_get_raw(idx).map_err(|e| SphinxQlError::Decode {
            column: name.clone(),
            message: e.to_string(),
        })?;

        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_ascii_uppercase();
            // The text protocol carries every value as text.
            let text = <&str as Decode<'_, MySql>>::decode(raw).map_err(|e| {
                SphinxQlError::Decode {
                    column: name.clone(),
                    message: e.to_string(),
                }
            })?;
            typed_value(&type_name, text)
        };
        decoded.insert(name, value);
    }
    Ok(decoded)
}

fn typed_value(type_name: &str, text: &str) -> Value {
    if type_name.contains("INT") {
        let parsed = if type_name.contains("UNSIGNED") {
            text.parse::<u64>().ok().map(Value::from)
        } else {
            text.parse::<i64>().ok().map(Value::from)
        };
        return parsed.unwrap_or_else(|| Value::String(text.to_string()));
    }

    if matches!(type_name, "FLOAT" | "DOUBLE" | "DECIMAL") {
        return text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.to_string()), Value::Number);
    }

    Value::String(text.to_string())
}
