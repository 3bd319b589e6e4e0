//! The relational executor consumed by the core.
//!
//! Any driver that can run SQL with named `:name` placeholders and return rows
//! as ordered maps can back a session.

use crate::{
    async_trait,
    stmt::{Row, Value},
    Result,
};

use indexmap::IndexMap;
use std::fmt::Debug;

/// Named bind parameters, in placeholder order.
pub type Params = IndexMap<String, Value>;

/// Outcome of an insert that may have produced a generated key.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedKeys {
    pub rows_affected: u64,
    pub key: Option<Value>,
}

/// Executes SQL against one physical connection.
///
/// Methods take `&self` so nested-fetch branches of a single query can share
/// the executor while they run concurrently on the calling task. A session
/// owns its executor exclusively.
#[async_trait]
pub trait Executor: Debug + Send + Sync {
    /// Runs a query and returns every row.
    async fn query_for_list(&self, sql: &str, params: &Params) -> Result<Vec<Row>>;

    /// Runs a query and returns the first row, if any.
    async fn query_for_map(&self, sql: &str, params: &Params) -> Result<Option<Row>> {
        Ok(self.query_for_list(sql, params).await?.into_iter().next())
    }

    /// Runs a query and returns the first column of the first row, or `Null`.
    async fn query_for_scalar(&self, sql: &str, params: &Params) -> Result<Value> {
        Ok(self
            .query_for_map(sql, params)
            .await?
            .and_then(|row| row.into_iter().next().map(|(_, value)| value))
            .unwrap_or(Value::Null))
    }

    /// Runs a data-modifying statement and returns the affected row count.
    async fn update(&self, sql: &str, params: &Params) -> Result<u64>;

    /// Runs an insert and returns the key generated by the database, if any.
    async fn update_and_return_generated_keys(
        &self,
        sql: &str,
        params: &Params,
    ) -> Result<GeneratedKeys>;

    /// Runs one statement once per parameter set.
    async fn batch_update(&self, sql: &str, batch: &[Params]) -> Result<Vec<u64>> {
        let mut counts = Vec::with_capacity(batch.len());
        for params in batch {
            counts.push(self.update(sql, params).await?);
        }
        Ok(counts)
    }

    /// Runs a parameterless statement such as DDL.
    async fn execute(&self, sql: &str) -> Result<()>;
}
