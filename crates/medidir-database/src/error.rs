//! Translation of driver errors into [`AppError`].

use medidir_core::error::{AppError, ErrorKind};

use crate::metrics::Operation;

/// Map a sqlx failure for `label` (e.g. "City") into the application error.
///
/// Unique violations become conflicts and check violations become
/// validation errors. Everything else is a storage error carrying the
/// driver error as its source.
pub(crate) fn query_error(label: &str, operation: Operation, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::conflict(format!("{label} already exists"));
        }
        if db.is_check_violation() {
            let constraint = db.constraint().unwrap_or("check").to_string();
            return AppError::validation(format!("{label} violates constraint '{constraint}'"));
        }
    }
    AppError::with_source(
        ErrorKind::Database,
        format!("Failed to {} {label}", verb(operation)),
        err,
    )
}

fn verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Find | Operation::FindMany => "find",
        Operation::Create | Operation::CreateMany => "create",
        Operation::Update | Operation::UpdateMany => "update",
        Operation::Delete | Operation::DeleteMany => "delete",
    }
}
