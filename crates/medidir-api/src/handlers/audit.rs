//! Audit log handlers (read-only).

use axum::Json;
use axum::extract::{Path, State};

use medidir_core::error::AppError;
use medidir_entity::AuditLog;
use medidir_entity::audit::AuditLogColumn;

use crate::dto::response::ApiResponse;
use crate::extractors::QueryFilter;
use crate::state::AppState;

/// GET /api/audit-log
pub async fn list(
    State(state): State<AppState>,
    QueryFilter(filter): QueryFilter<AuditLogColumn>,
) -> Result<Json<ApiResponse<Vec<AuditLog>>>, AppError> {
    let entries = state.audit_log.find_many(&filter).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /api/audit-log/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<AuditLog>>, AppError> {
    let entry = state.audit_log.find(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}
