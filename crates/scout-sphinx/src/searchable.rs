use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ScoutError};

/// Column holding the document id in every index.
pub const DOCUMENT_ID: &str = "id";

/// Field name to indexable value.
pub type Fields = Map<String, Value>;

/// An application entity that can be written to and matched in an index.
pub trait Searchable {
    /// Name of the index the entity lives in.
    fn searchable_as(&self) -> String;

    fn search_key(&self) -> u64;

    fn to_searchable_fields(&self) -> Fields;
}

/// The persistence layer that search hits are resolved against.
#[async_trait]
pub trait ModelRepository<M: Send>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Column of a search hit that identifies the stored model.
    fn key_name(&self) -> &str {
        DOCUMENT_ID
    }

    async fn find_many(&self, keys: &[u64]) -> std::result::Result<Vec<M>, Self::Error>;
}

/// A schemaless searchable record, for callers without a model type of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub index: String,
    pub id: u64,
    pub fields: Fields,
}

impl Document {
    pub fn new(index: impl Into<String>, id: u64) -> Self {
        Self {
            index: index.into(),
            id,
            fields: Fields::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// A document from a JSON object whose `id` member is the document id.
    pub fn from_json(index: impl Into<String>, value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(ScoutError::InvalidModel(
                "document must be a JSON object".to_string(),
            ));
        };
        let id = fields
            .remove(DOCUMENT_ID)
            .as_ref()
            .and_then(key_from_value)
            .ok_or_else(|| {
                ScoutError::InvalidModel("document needs a positive integer `id`".to_string())
            })?;

        Ok(Self {
            index: index.into(),
            id,
            fields,
        })
    }

    /// A blank document whose field names drive match-field discovery.
    pub fn template<I, S>(index: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index: index.into(),
            id: 0,
            fields: fields
                .into_iter()
                .map(|name| (name.into(), Value::Null))
                .collect(),
        }
    }
}

impl Searchable for Document {
    fn searchable_as(&self) -> String {
        self.index.clone()
    }

    fn search_key(&self) -> u64 {
        self.id
    }

    fn to_searchable_fields(&self) -> Fields {
        self.fields.clone()
    }
}

/// Reads a document id from a result cell, which the daemon may send as text.
pub fn key_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
