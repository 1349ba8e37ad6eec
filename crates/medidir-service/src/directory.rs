//! Generic CRUD service shared by every directory entity.

use std::sync::Arc;

use tracing::info;

use medidir_core::error::AppError;
use medidir_core::result::AppResult;
use medidir_core::traits::{Entity, Repository};
use medidir_core::types::{Changes, Filter};

/// Thin service over one entity's repository.
///
/// A repository `NotFound` is reported as "`<Label> <id> not found`".
/// Every other failure, storage errors included, is returned unchanged.
pub struct DirectoryService<T: Entity> {
    repo: Arc<dyn Repository<T>>,
}

impl<T: Entity> Clone for DirectoryService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<T: Entity> std::fmt::Debug for DirectoryService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryService")
            .field("entity", &T::LABEL)
            .finish()
    }
}

impl<T: Entity> DirectoryService<T> {
    /// Creates a new directory service.
    pub fn new(repo: Arc<dyn Repository<T>>) -> Self {
        Self { repo }
    }

    /// Fetch one record.
    pub async fn get_by_id(&self, id: i64) -> AppResult<T> {
        self.repo.find(id).await.map_err(|e| Self::not_found(e, id))
    }

    /// Every record matching `filter`. An empty filter lists everything.
    pub async fn list(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>> {
        self.repo.find_many(filter).await
    }

    /// Validate and store one record.
    pub async fn create(&self, entity: T) -> AppResult<T> {
        entity.validate()?;
        let created = self.repo.create(&entity).await?;
        info!(entity = T::LABEL, "Record created");
        Ok(created)
    }

    /// Validate and store a batch atomically.
    pub async fn create_many(&self, entities: Vec<T>) -> AppResult<Vec<T>> {
        for (index, entity) in entities.iter().enumerate() {
            entity.validate().map_err(|e| {
                AppError::new(e.kind, format!("item {index}: {}", e.message))
            })?;
        }
        let created = self.repo.create_many(&entities).await?;
        info!(entity = T::LABEL, count = created.len(), "Records created");
        Ok(created)
    }

    /// Apply a partial update to one record.
    pub async fn update(&self, id: i64, changes: &Changes<T::Column>) -> AppResult<T> {
        let updated = self
            .repo
            .update(id, changes)
            .await
            .map_err(|e| Self::not_found(e, id))?;
        info!(entity = T::LABEL, id, fields = changes.len(), "Record updated");
        Ok(updated)
    }

    /// Apply a partial update to every matching record.
    pub async fn update_many(
        &self,
        filter: &Filter<T::Column>,
        changes: &Changes<T::Column>,
    ) -> AppResult<u64> {
        let affected = self.repo.update_many(filter, changes).await?;
        info!(entity = T::LABEL, affected, "Records updated");
        Ok(affected)
    }

    /// Remove one record and return it.
    pub async fn delete(&self, id: i64) -> AppResult<T> {
        let deleted = self.repo.delete(id).await.map_err(|e| Self::not_found(e, id))?;
        info!(entity = T::LABEL, id, "Record deleted");
        Ok(deleted)
    }

    /// Remove every matching record and return them.
    pub async fn delete_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>> {
        let deleted = self.repo.delete_many(filter).await?;
        info!(entity = T::LABEL, count = deleted.len(), "Records deleted");
        Ok(deleted)
    }

    fn not_found(err: AppError, id: i64) -> AppError {
        if err.is_not_found() {
            AppError::not_found(format!("{} {id} not found", T::LABEL))
        } else {
            err
        }
    }
}
