//! # medidir-database
//!
//! PostgreSQL connection management, the dynamic statement builder, the
//! generic repository engine used by every entity, and per-table query
//! metrics.

pub mod connection;
mod error;
pub mod metrics;
pub mod migration;
pub mod repositories;
pub mod sql;

pub use connection::DatabasePool;
pub use metrics::{Operation, QueryMetrics};
pub use repositories::{AuditLogRepository, PgRepository};
