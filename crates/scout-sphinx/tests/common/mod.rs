#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use scout_sphinx::{Fields, ModelRepository, Searchable};
use serde_json::{Value, json};
use sphinxql::{Connection, MultiResultSet, ResultSet, Row};

/// Captures every statement and answers with scripted result sets.
#[derive(Default)]
pub struct RecordingConnection {
    round_trips: Mutex<Vec<Vec<String>>>,
    responses: Mutex<VecDeque<Vec<ResultSet>>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, sets: Vec<ResultSet>) -> Self {
        self.responses.lock().unwrap().push_back(sets);
        self
    }

    /// Statements grouped by the round-trip that carried them.
    pub fn round_trips(&self) -> Vec<Vec<String>> {
        self.round_trips.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<String> {
        self.round_trips().into_iter().flatten().collect()
    }

    fn next_response(&self, statements: usize) -> Vec<ResultSet> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![ResultSet::affected(0); statements])
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    async fn query(&self, sql: &str) -> sphinxql::Result<ResultSet> {
        self.round_trips.lock().unwrap().push(vec![sql.to_string()]);
        Ok(self.next_response(1).into_iter().next().unwrap_or_default())
    }

    async fn multi_query(&self, statements: &[String]) -> sphinxql::Result<MultiResultSet> {
        self.round_trips.lock().unwrap().push(statements.to_vec());
        Ok(MultiResultSet::new(self.next_response(statements.len())))
    }
}

/// Fails every call the way an unreachable daemon does.
pub struct UnreachableConnection;

#[async_trait]
impl Connection for UnreachableConnection {
    async fn query(&self, _sql: &str) -> sphinxql::Result<ResultSet> {
        Err(sphinxql::SphinxQlError::from_driver(sqlx::Error::PoolTimedOut))
    }

    async fn multi_query(&self, _statements: &[String]) -> sphinxql::Result<MultiResultSet> {
        Err(sphinxql::SphinxQlError::from_driver(sqlx::Error::PoolTimedOut))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub body: String,
}

impl Article {
    pub fn new(id: u64, title: &str, body: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

impl Searchable for Article {
    fn searchable_as(&self) -> String {
        "articles".to_string()
    }

    fn search_key(&self) -> u64 {
        self.id
    }

    fn to_searchable_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("body".to_string(), json!(self.body));
        fields.insert("title".to_string(), json!(self.title));
        fields
    }
}

/// In-memory store that answers lookups in ascending id order.
pub struct ArticleStore {
    articles: Vec<Article>,
    lookups: Mutex<Vec<Vec<u64>>>,
}

impl ArticleStore {
    pub fn new(mut articles: Vec<Article>) -> Self {
        articles.sort_by_key(|a| a.id);
        Self {
            articles,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<Vec<u64>> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelRepository<Article> for ArticleStore {
    type Error = std::convert::Infallible;

    async fn find_many(&self, keys: &[u64]) -> Result<Vec<Article>, Self::Error> {
        self.lookups.lock().unwrap().push(keys.to_vec());
        Ok(self
            .articles
            .iter()
            .filter(|a| keys.contains(&a.id))
            .cloned()
            .collect())
    }
}

pub struct BrokenStore;

#[async_trait]
impl ModelRepository<Article> for BrokenStore {
    type Error = std::io::Error;

    async fn find_many(&self, _keys: &[u64]) -> Result<Vec<Article>, Self::Error> {
        Err(std::io::Error::other("database is down"))
    }
}

pub fn hit_rows(ids: &[u64]) -> ResultSet {
    let rows = ids
        .iter()
        .map(|id| {
            let mut row = Row::new();
            row.insert("id".to_string(), json!(id));
            row.insert("weight".to_string(), json!(1500));
            row
        })
        .collect();
    ResultSet::new(vec!["id".to_string(), "weight".to_string()], rows)
}

pub fn meta_rows(pairs: &[(&str, &str)]) -> ResultSet {
    let rows = pairs
        .iter()
        .map(|(name, value)| {
            let mut row = Row::new();
            row.insert("Variable_name".to_string(), Value::from(*name));
            row.insert("Value".to_string(), Value::from(*value));
            row
        })
        .collect();
    ResultSet::new(vec!["Variable_name".to_string(), "Value".to_string()], rows)
}
