use serde_json::Value;

/// A full-text query against the index of `model`.
///
/// `model` is only consulted for its index name and field names.
#[derive(Debug, Clone)]
pub struct SearchBuilder<M> {
    pub model: M,
    pub query: String,
    pub limit: Option<u64>,
    pub wheres: Vec<(String, Value)>,
}

impl<M> SearchBuilder<M> {
    pub fn new(model: M, query: impl Into<String>) -> Self {
        Self {
            model,
            query: query.into(),
            limit: None,
            wheres: Vec::new(),
        }
    }

    /// Caps the number of hits; zero leaves the search unbounded.
    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restricts matches to documents whose attribute equals `value`.
    #[must_use]
    pub fn where_eq(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.wheres.push((attribute.into(), value.into()));
        self
    }
}
