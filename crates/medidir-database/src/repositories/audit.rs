//! Read-only access to the audit trail written by database triggers.

use std::sync::Arc;

use sqlx::PgPool;

use medidir_core::result::AppResult;
use medidir_core::traits::Repository;
use medidir_core::types::Filter;
use medidir_entity::AuditLog;
use medidir_entity::audit::AuditLogColumn;

use super::pg::PgRepository;
use crate::metrics::QueryMetrics;

/// Audit log entries are produced by triggers, never by the application,
/// so this repository only exposes the read half of the contract.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    inner: PgRepository<AuditLog>,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool, metrics: Arc<QueryMetrics>) -> Self {
        Self {
            inner: PgRepository::new(pool, metrics),
        }
    }

    /// Fetch one entry by id.
    pub async fn find(&self, id: i64) -> AppResult<AuditLog> {
        self.inner.find(id).await
    }

    /// Entries matching the filter, oldest first.
    pub async fn find_many(&self, filter: &Filter<AuditLogColumn>) -> AppResult<Vec<AuditLog>> {
        self.inner.find_many(filter).await
    }
}
