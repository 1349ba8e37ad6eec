//! Generic repository trait for database access.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::entity::Entity;
use crate::types::filter::{Changes, Filter};

/// Generic CRUD contract satisfied by every entity's repository.
///
/// Single-row operations return `ErrorKind::NotFound` when no row has the
/// given id. Bulk mutations refuse an empty filter, and updates refuse an
/// empty change-set, with `ErrorKind::Validation`.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync + 'static {
    /// Fetch exactly one row by primary key.
    async fn find(&self, id: i64) -> AppResult<T>;

    /// Fetch every row matching the filter, ordered by id.
    async fn find_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>>;

    /// Insert one row and return it as stored.
    async fn create(&self, entity: &T) -> AppResult<T>;

    /// Insert all rows atomically, returning them in input order.
    async fn create_many(&self, entities: &[T]) -> AppResult<Vec<T>>;

    /// Apply a partial update to one row and return the updated row.
    async fn update(&self, id: i64, changes: &Changes<T::Column>) -> AppResult<T>;

    /// Apply a partial update to every matching row. Returns the row count.
    async fn update_many(
        &self,
        filter: &Filter<T::Column>,
        changes: &Changes<T::Column>,
    ) -> AppResult<u64>;

    /// Remove one row and return it.
    async fn delete(&self, id: i64) -> AppResult<T>;

    /// Remove every matching row and return the removed rows.
    async fn delete_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>>;
}
