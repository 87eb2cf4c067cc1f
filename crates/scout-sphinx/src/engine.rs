use async_trait::async_trait;

use crate::builder::SearchBuilder;
use crate::error::Result;
use crate::results::SearchResults;
use crate::searchable::{ModelRepository, Searchable};

/// The indexing and search contract an application's model layer drives.
///
/// `update` and `delete` follow model saves and removals; `search`,
/// `paginate` and `get` run queries; the `map*` functions turn hits back into
/// models.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Writes the batch to the index of its first model. Empty batches are a no-op.
    async fn update<M>(&self, models: &[M]) -> Result<()>
    where
        M: Searchable + Sync;

    /// Removes every model of the batch from the index of its first model.
    async fn delete<M>(&self, models: &[M]) -> Result<()>
    where
        M: Searchable + Sync;

    async fn search<M>(&self, builder: &SearchBuilder<M>) -> Result<SearchResults>
    where
        M: Searchable + Sync;

    /// One page of hits together with the total match count, in one round-trip.
    async fn paginate<M>(
        &self,
        builder: &SearchBuilder<M>,
        per_page: u64,
        page: u64,
    ) -> Result<SearchResults>
    where
        M: Searchable + Sync;

    /// Resolves the hits under the result cursor through `repository`.
    async fn map<M, R>(&self, results: &SearchResults, repository: &R) -> Result<Vec<M>>
    where
        M: Searchable + Send,
        R: ModelRepository<M>;

    /// Resolves the stored hits through `repository`.
    async fn map_get<M, R>(&self, results: &SearchResults, repository: &R) -> Result<Vec<M>>
    where
        M: Searchable + Send,
        R: ModelRepository<M>;

    fn map_ids(&self, results: &SearchResults) -> Vec<u64>;

    fn get_total_count(&self, results: &SearchResults) -> u64;

    async fn get<M, R>(&self, builder: &SearchBuilder<M>, repository: &R) -> Result<Vec<M>>
    where
        M: Searchable + Send + Sync,
        R: ModelRepository<M>,
    {
        let results = self.search(builder).await?;
        self.map_get(&results, repository).await
    }
}
