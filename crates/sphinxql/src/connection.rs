use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::result::{MultiResultSet, ResultSet};

/// A handle that can run compiled SphinxQL against a daemon.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn query(&self, sql: &str) -> Result<ResultSet>;

    /// Runs every statement in a single round-trip, one result set per statement.
    async fn multi_query(&self, statements: &[String]) -> Result<MultiResultSet>;
}

#[async_trait]
impl<C> Connection for Arc<C>
where
    C: Connection + ?Sized,
{
    async fn query(&self, sql: &str) -> Result<ResultSet> {
        (**self).query(sql).await
    }

    async fn multi_query(&self, statements: &[String]) -> Result<MultiResultSet> {
        (**self).multi_query(statements).await
    }
}
