use sphinxql::{MultiResultSet, ResultSet, Row, SearchMeta};

/// Hits of one search call, plus the `SHOW META` block for paginated calls.
///
/// Rows are fully read off the wire before this is built, so the live cursor
/// and the stored rows address the same hit set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    hits: ResultSet,
    meta: Option<SearchMeta>,
}

impl SearchResults {
    pub const fn new(hits: ResultSet, meta: Option<SearchMeta>) -> Self {
        Self { hits, meta }
    }

    pub const fn from_result(hits: ResultSet) -> Self {
        Self::new(hits, None)
    }

    /// First set holds the hits, the second the meta block.
    pub fn from_batch(batch: MultiResultSet) -> Self {
        let mut sets = batch.into_sets().into_iter();
        let hits = sets.next().unwrap_or_default();
        let meta = sets.next().map(|set| SearchMeta::from_result(&set));
        Self { hits, meta }
    }

    /// Rows under the result cursor.
    pub fn current(&self) -> &[Row] {
        self.hits.rows()
    }

    /// Rows materialized from the response.
    pub fn stored(&self) -> &[Row] {
        self.hits.rows()
    }

    pub const fn meta(&self) -> Option<&SearchMeta> {
        self.meta.as_ref()
    }

    pub fn len(&self) -> usize {
        self.hits.count()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Total matches in the index when the daemon reported it, otherwise the
    /// number of rows returned.
    pub fn count(&self) -> u64 {
        self.meta
            .as_ref()
            .map_or(self.hits.count() as u64, |meta| meta.total_found)
    }
}
