//! Audit log entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;

/// A row-change record written by database triggers. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct AuditLog {
    pub id: i64,
    pub table_name: String,
    /// `INSERT`, `UPDATE`, or `DELETE`.
    pub operation: String,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
    pub changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `audit_log`.
    pub enum AuditLogColumn {
        Id => ("id", BigInt, false),
        TableName => ("table_name", Text, false),
        Operation => ("operation", Text, false),
        OldData => ("old_data", Json, true),
        NewData => ("new_data", Json, true),
        ChangedAt => ("changed_at", Timestamp, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for AuditLog {
    type Column = AuditLogColumn;
    const TABLE: &'static str = "audit_log";
    const LABEL: &'static str = "Audit log entry";

    fn insert_values(&self) -> Vec<(AuditLogColumn, FieldValue)> {
        vec![
            (AuditLogColumn::TableName, self.table_name.clone().into()),
            (AuditLogColumn::Operation, self.operation.clone().into()),
            (AuditLogColumn::OldData, self.old_data.clone().into()),
            (AuditLogColumn::NewData, self.new_data.clone().into()),
            (AuditLogColumn::ChangedAt, self.changed_at.into()),
        ]
    }
}
