//! Fluent SphinxQL statement builder.
//!
//! Statements are rendered to text and sent over the text protocol, so every
//! literal is quoted here and every identifier is checked before it is spliced
//! into the statement.

use serde_json::Value;

use crate::connection::Connection;
use crate::error::{Result, SphinxQlError};
use crate::escape::{escape_match, is_identifier, quote_str, quote_value};
use crate::result::{MultiResultSet, ResultSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Kind {
    #[default]
    Select,
    Insert,
    Replace,
    Delete,
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
struct MatchClause {
    fields: Vec<String>,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(String, Value),
    In(String, Vec<Value>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphinxQL {
    kind: Kind,
    select: Vec<String>,
    index: Option<String>,
    columns: Vec<String>,
    values: Vec<Vec<Value>>,
    matches: Vec<MatchClause>,
    conditions: Vec<Condition>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SphinxQL {
    pub fn select<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: Kind::Select,
            select: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn insert() -> Self {
        Self {
            kind: Kind::Insert,
            ..Self::default()
        }
    }

    pub fn replace() -> Self {
        Self {
            kind: Kind::Replace,
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            kind: Kind::Delete,
            ..Self::default()
        }
    }

    /// A statement sent verbatim, such as `SHOW META`.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            kind: Kind::Raw(sql.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    #[must_use]
    pub fn into_index(self, index: impl Into<String>) -> Self {
        self.from(index)
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn values(mut self, row: Vec<Value>) -> Self {
        self.values.push(row);
        self
    }

    /// Full-text match of `text` restricted to `fields`; an empty field list
    /// matches across all full-text fields.
    #[must_use]
    pub fn match_fields<I, S>(mut self, fields: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matches.push(MatchClause {
            fields: fields.into_iter().map(Into::into).collect(),
            text: text.into(),
        });
        self
    }

    #[must_use]
    pub fn where_eq(mut self, column: impl Into<String>, value: Value) -> Self {
        self.conditions.push(Condition::Eq(column.into(), value));
        self
    }

    #[must_use]
    pub fn where_in(mut self, column: impl Into<String>, values: Vec<Value>) -> Self {
        self.conditions.push(Condition::In(column.into(), values));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn limit_offset(self, offset: u64, limit: u64) -> Self {
        self.offset(offset).limit(limit)
    }

    /// Queues another statement to run in the same round-trip.
    #[must_use]
    pub fn enqueue(self, next: Self) -> Batch {
        Batch::new().enqueue(self).enqueue(next)
    }

    pub fn compile(&self) -> Result<String> {
        match &self.kind {
            Kind::Raw(sql) => Ok(sql.clone()),
            Kind::Select => self.compile_select(),
            Kind::Insert => self.compile_insert("INSERT"),
            Kind::Replace => self.compile_insert("REPLACE"),
            Kind::Delete => self.compile_delete(),
        }
    }

    pub async fn execute<C>(&self, connection: &C) -> Result<ResultSet>
    where
        C: Connection + ?Sized,
    {
        let sql = self.compile()?;
        connection.query(&sql).await
    }

    fn index(&self) -> Result<&str> {
        let index = self
            .index
            .as_deref()
            .ok_or_else(|| SphinxQlError::build("no index given"))?;
        check_identifier(index)?;
        Ok(index)
    }

    fn compile_select(&self) -> Result<String> {
        let index = self.index()?;
        let columns = if self.select.is_empty() {
            "*".to_string()
        } else {
            for column in &self.select {
                check_identifier(column)?;
            }
            self.select.join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {index}");
        sql.push_str(&self.compile_where()?);

        match (self.offset, self.limit) {
            (Some(offset), Some(limit)) => sql.push_str(&format!(" LIMIT {offset}, {limit}")),
            (None, Some(limit)) => sql.push_str(&format!(" LIMIT {limit}")),
            (Some(_), None) => return Err(SphinxQlError::build("offset given without a limit")),
            (None, None) => {}
        }

        Ok(sql)
    }

    fn compile_insert(&self, verb: &str) -> Result<String> {
        let index = self.index()?;
        if self.columns.is_empty() {
            return Err(SphinxQlError::build(format!("{verb} into {index} without columns")));
        }
        if self.values.is_empty() {
            return Err(SphinxQlError::build(format!("{verb} into {index} without values")));
        }
        for column in &self.columns {
            check_identifier(column)?;
        }

        let mut rows = Vec::with_capacity(self.values.len());
        for row in &self.values {
            if row.len() != self.columns.len() {
                return Err(SphinxQlError::build(format!(
                    "row has {} values for {} columns",
                    row.len(),
                    self.columns.len()
                )));
            }
            let rendered: Vec<String> = row.iter().map(quote_value).collect();
            rows.push(format!("({})", rendered.join(", ")));
        }

        Ok(format!(
            "{verb} INTO {index} ({}) VALUES {}",
            self.columns.join(", "),
            rows.join(", ")
        ))
    }

    fn compile_delete(&self) -> Result<String> {
        let index = self.index()?;
        if self.conditions.is_empty() && self.matches.is_empty() {
            return Err(SphinxQlError::build(format!(
                "refusing to delete from {index} without a condition"
            )));
        }
        Ok(format!("DELETE FROM {index}{}", self.compile_where()?))
    }

    fn compile_where(&self) -> Result<String> {
        let mut clauses = Vec::new();

        let matched: Vec<String> = self
            .matches
            .iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(compile_match)
            .collect::<Result<_>>()?;
        if !matched.is_empty() {
            clauses.push(format!("MATCH({})", quote_str(matched.join(" ").trim())));
        }

        for condition in &self.conditions {
            clauses.push(match condition {
                Condition::Eq(column, value) => {
                    check_identifier(column)?;
                    format!("{column} = {}", quote_value(value))
                }
                Condition::In(column, values) => {
                    check_identifier(column)?;
                    if values.is_empty() {
                        return Err(SphinxQlError::build(format!("empty IN list for {column}")));
                    }
                    let rendered: Vec<String> = values.iter().map(quote_value).collect();
                    format!("{column} IN ({})", rendered.join(", "))
                }
            });
        }

        if clauses.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", clauses.join(" AND ")))
        }
    }
}

fn compile_match(clause: &MatchClause) -> Result<String> {
    let text = escape_match(clause.text.trim());
    match clause.fields.as_slice() {
        [] => Ok(format!("({text})")),
        [field] => {
            check_identifier(field)?;
            Ok(format!("(@{field} {text})"))
        }
        fields => {
            for field in fields {
                check_identifier(field)?;
            }
            Ok(format!("(@({}) {text})", fields.join(",")))
        }
    }
}

fn check_identifier(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(SphinxQlError::build(format!("invalid identifier `{name}`")))
    }
}

/// Statements executed together in one round-trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    statements: Vec<SphinxQL>,
}

impl Batch {
    pub const fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    #[must_use]
    pub fn enqueue(mut self, statement: SphinxQL) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn compile(&self) -> Result<Vec<String>> {
        self.statements.iter().map(SphinxQL::compile).collect()
    }

    pub async fn execute<C>(&self, connection: &C) -> Result<MultiResultSet>
    where
        C: Connection + ?Sized,
    {
        if self.statements.is_empty() {
            return Err(SphinxQlError::build("empty batch"));
        }
        let statements = self.compile()?;
        connection.multi_query(&statements).await
    }
}
