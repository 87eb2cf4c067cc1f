//! [`Engine`] over a SphinxQL connection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sphinxql::{Connection, Helper, Row, SphinxQL, SphinxQlError};

use crate::builder::SearchBuilder;
use crate::engine::Engine;
use crate::error::{Result, ScoutError};
use crate::results::SearchResults;
use crate::searchable::{DOCUMENT_ID, ModelRepository, Searchable, key_from_value};

pub struct SphinxEngine<C> {
    connection: Arc<C>,
}

impl<C> Clone for SphinxEngine<C> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
        }
    }
}

impl<C> SphinxEngine<C>
where
    C: Connection,
{
    pub fn new(connection: C) -> Self {
        Self::from_shared(Arc::new(connection))
    }

    pub const fn from_shared(connection: Arc<C>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// `SELECT * … MATCH(…)` over every field of the builder's model except the id.
    fn match_query<M: Searchable>(builder: &SearchBuilder<M>) -> SphinxQL {
        let index = builder.model.searchable_as();
        let fields: Vec<String> = builder
            .model
            .to_searchable_fields()
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name != DOCUMENT_ID)
            .collect();

        let mut query = SphinxQL::select(["*"])
            .from(index)
            .match_fields(fields, builder.query.clone());
        for (attribute, value) in &builder.wheres {
            query = query.where_eq(attribute.clone(), value.clone());
        }
        query
    }

    async fn hydrate<M, R>(rows: &[Row], repository: &R) -> Result<Vec<M>>
    where
        M: Searchable + Send,
        R: ModelRepository<M>,
    {
        let key_name = repository.key_name();
        let keys: Vec<u64> = rows
            .iter()
            .filter_map(|row| row.get(key_name).and_then(key_from_value))
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut models = repository
            .find_many(&keys)
            .await
            .map_err(|e| ScoutError::Repository(Box::new(e)))?;

        // Restore search ranking; the repository returns its own order.
        let rank: HashMap<u64, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        models.retain(|model| rank.contains_key(&model.search_key()));
        models.sort_by_key(|model| rank.get(&model.search_key()).copied().unwrap_or(usize::MAX));

        Ok(models)
    }
}

#[async_trait]
impl<C> Engine for SphinxEngine<C>
where
    C: Connection,
{
    async fn update<M>(&self, models: &[M]) -> Result<()>
    where
        M: Searchable + Sync,
    {
        let Some(first) = models.first() else {
            return Ok(());
        };

        let index = first.searchable_as();
        let fields = first.to_searchable_fields();
        if fields.is_empty() {
            return Err(ScoutError::InvalidModel(format!(
                "model {} for index {index} has no searchable fields",
                first.search_key()
            )));
        }

        let field_names: Vec<String> = fields
            .into_iter()
            .map(|(name, _)| name)
            .filter(|name| name != DOCUMENT_ID)
            .collect();
        let columns = std::iter::once(DOCUMENT_ID.to_string()).chain(field_names.iter().cloned());

        let mut query = SphinxQL::replace().into_index(index.as_str()).columns(columns);
        for model in models {
            let mut values = model.to_searchable_fields();
            let mut row = Vec::with_capacity(field_names.len() + 1);
            row.push(Value::from(model.search_key()));
            row.extend(
                field_names
                    .iter()
                    .map(|name| values.remove(name).unwrap_or(Value::Null)),
            );
            query = query.values(row);
        }

        let result = query.execute(self.connection.as_ref()).await?;
        tracing::debug!(
            index = %index,
            rows = models.len(),
            affected = result.affected_rows(),
            "replaced documents"
        );
        Ok(())
    }

    async fn delete<M>(&self, models: &[M]) -> Result<()>
    where
        M: Searchable + Sync,
    {
        let Some(first) = models.first() else {
            return Ok(());
        };

        let index = first.searchable_as();
        let keys: Vec<Value> = models
            .iter()
            .map(|model| Value::from(model.search_key()))
            .collect();

        let result = SphinxQL::delete()
            .from(index.as_str())
            .where_in(DOCUMENT_ID, keys)
            .execute(self.connection.as_ref())
            .await?;
        tracing::debug!(
            index = %index,
            requested = models.len(),
            affected = result.affected_rows(),
            "deleted documents"
        );
        Ok(())
    }

    async fn search<M>(&self, builder: &SearchBuilder<M>) -> Result<SearchResults>
    where
        M: Searchable + Sync,
    {
        let mut query = Self::match_query(builder);
        // A zero limit means no limit.
        if let Some(limit) = builder.limit.filter(|limit| *limit > 0) {
            query = query.limit(limit);
        }

        let hits = query.execute(self.connection.as_ref()).await?;
        Ok(SearchResults::from_result(hits))
    }

    async fn paginate<M>(
        &self,
        builder: &SearchBuilder<M>,
        per_page: u64,
        page: u64,
    ) -> Result<SearchResults>
    where
        M: Searchable + Sync,
    {
        if per_page == 0 {
            return Err(SphinxQlError::build("per_page must be at least 1").into());
        }
        let offset = page.saturating_sub(1).saturating_mul(per_page);

        let batch = Self::match_query(builder)
            .limit_offset(offset, per_page)
            .enqueue(Helper::show_meta())
            .execute(self.connection.as_ref())
            .await?;
        Ok(SearchResults::from_batch(batch))
    }

    async fn map<M, R>(&self, results: &SearchResults, repository: &R) -> Result<Vec<M>>
    where
        M: Searchable + Send,
        R: ModelRepository<M>,
    {
        Self::hydrate(results.current(), repository).await
    }

    async fn map_get<M, R>(&self, results: &SearchResults, repository: &R) -> Result<Vec<M>>
    where
        M: Searchable + Send,
        R: ModelRepository<M>,
    {
        Self::hydrate(results.stored(), repository).await
    }

    fn map_ids(&self, results: &SearchResults) -> Vec<u64> {
        results
            .stored()
            .iter()
            .filter_map(|row| row.get(DOCUMENT_ID).and_then(key_from_value))
            .collect()
    }

    fn get_total_count(&self, results: &SearchResults) -> u64 {
        results.count()
    }
}
