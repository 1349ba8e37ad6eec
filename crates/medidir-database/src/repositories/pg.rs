//! The generic PostgreSQL repository shared by every entity.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::types::Json;
use sqlx::{Arguments, FromRow, PgPool};
use tracing::debug;

use medidir_core::error::{AppError, ErrorKind};
use medidir_core::result::AppResult;
use medidir_core::traits::{Entity, Repository};
use medidir_core::types::{Changes, ColumnKind, FieldValue, Filter};

use crate::error::query_error;
use crate::metrics::{Operation, QueryMetrics};
use crate::sql::{self, Param};

/// Repository for any [`Entity`], backed by one PostgreSQL table.
///
/// Every call goes through [`QueryMetrics::track`] under the entity's table
/// name, so each table gets its own latency, count, and in-flight series.
pub struct PgRepository<T> {
    pool: PgPool,
    metrics: Arc<QueryMetrics>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for PgRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            metrics: Arc::clone(&self.metrics),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for PgRepository<T>
where
    T: Entity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("table", &T::TABLE)
            .finish_non_exhaustive()
    }
}

impl<T> PgRepository<T>
where
    T: Entity + for<'r> FromRow<'r, PgRow>,
{
    /// Create a new repository.
    pub fn new(pool: PgPool, metrics: Arc<QueryMetrics>) -> Self {
        Self {
            pool,
            metrics,
            _entity: PhantomData,
        }
    }

    /// The pool this repository runs on.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The metrics client this repository reports to.
    pub fn metrics(&self) -> &Arc<QueryMetrics> {
        &self.metrics
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found(format!("{} {id} not found", T::LABEL))
    }
}

#[async_trait]
impl<T> Repository<T> for PgRepository<T>
where
    T: Entity + for<'r> FromRow<'r, PgRow>,
{
    async fn find(&self, id: i64) -> AppResult<T> {
        let op = Operation::Find;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::select_by_id(T::TABLE, id);
                let args = arguments(stmt.params)?;
                sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))?
                    .ok_or_else(|| Self::not_found(id))
            })
            .await
    }

    async fn find_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>> {
        let op = Operation::FindMany;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::select_many(T::TABLE, filter);
                let args = arguments(stmt.params)?;
                sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))
            })
            .await
    }

    async fn create(&self, entity: &T) -> AppResult<T> {
        let op = Operation::Create;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::insert(T::TABLE, &entity.insert_values());
                let args = arguments(stmt.params)?;
                sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))
            })
            .await
    }

    async fn create_many(&self, entities: &[T]) -> AppResult<Vec<T>> {
        let op = Operation::CreateMany;
        self.metrics
            .track(T::TABLE, op, async {
                if entities.is_empty() {
                    return Ok(Vec::new());
                }

                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))?;

                let mut created = Vec::with_capacity(entities.len());
                for entity in entities {
                    let stmt = sql::insert(T::TABLE, &entity.insert_values());
                    let args = arguments(stmt.params)?;
                    // An early return drops `tx`, which rolls the batch back.
                    let row = sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|e| query_error(T::LABEL, op, e))?;
                    created.push(row);
                }

                tx.commit()
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))?;

                debug!(table = T::TABLE, count = created.len(), "Batch inserted");
                Ok(created)
            })
            .await
    }

    async fn update(&self, id: i64, changes: &Changes<T::Column>) -> AppResult<T> {
        let op = Operation::Update;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::update_by_id(T::TABLE, id, changes)?;
                let args = arguments(stmt.params)?;
                sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))?
                    .ok_or_else(|| Self::not_found(id))
            })
            .await
    }

    async fn update_many(
        &self,
        filter: &Filter<T::Column>,
        changes: &Changes<T::Column>,
    ) -> AppResult<u64> {
        let op = Operation::UpdateMany;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::update_many(T::TABLE, filter, changes)?;
                let args = arguments(stmt.params)?;
                sqlx::query_with(&stmt.sql, args)
                    .execute(&self.pool)
                    .await
                    .map(|done| done.rows_affected())
                    .map_err(|e| query_error(T::LABEL, op, e))
            })
            .await
    }

    async fn delete(&self, id: i64) -> AppResult<T> {
        let op = Operation::Delete;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::delete_by_id(T::TABLE, id);
                let args = arguments(stmt.params)?;
                sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))?
                    .ok_or_else(|| Self::not_found(id))
            })
            .await
    }

    async fn delete_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>> {
        let op = Operation::DeleteMany;
        self.metrics
            .track(T::TABLE, op, async {
                let stmt = sql::delete_many(T::TABLE, filter)?;
                let args = arguments(stmt.params)?;
                sqlx::query_as_with::<_, T, _>(&stmt.sql, args)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| query_error(T::LABEL, op, e))
            })
            .await
    }
}

/// Encode statement parameters, choosing the PostgreSQL type from the
/// column kind so NULLs are typed and JSON goes over as `jsonb`.
pub(crate) fn arguments(params: Vec<Param>) -> AppResult<PgArguments> {
    let mut args = PgArguments::default();
    for Param { kind, value } in params {
        let added = match value {
            FieldValue::Null => add_null(&mut args, kind),
            FieldValue::Int(v) if kind == ColumnKind::Integer => {
                let narrowed = i32::try_from(v).map_err(|_| {
                    AppError::validation(format!("{v} is out of range for integer"))
                })?;
                args.add(narrowed)
            }
            FieldValue::Int(v) => args.add(v),
            FieldValue::Float(v) => args.add(v),
            FieldValue::Bool(v) => args.add(v),
            FieldValue::Text(v) => args.add(v),
            FieldValue::Timestamp(v) => args.add(v),
            FieldValue::Date(v) => args.add(v),
            FieldValue::Time(v) => args.add(v),
            FieldValue::Json(v) => args.add(Json(v)),
        };
        added.map_err(|e| {
            AppError::new(
                ErrorKind::Internal,
                format!("Failed to encode {kind} parameter: {e}"),
            )
        })?;
    }
    Ok(args)
}

fn add_null(args: &mut PgArguments, kind: ColumnKind) -> Result<(), sqlx::error::BoxDynError> {
    match kind {
        ColumnKind::BigInt => args.add(None::<i64>),
        ColumnKind::Integer => args.add(None::<i32>),
        ColumnKind::Double => args.add(None::<f64>),
        ColumnKind::Boolean => args.add(None::<bool>),
        ColumnKind::Text => args.add(None::<String>),
        ColumnKind::Timestamp => args.add(None::<DateTime<Utc>>),
        ColumnKind::Date => args.add(None::<NaiveDate>),
        ColumnKind::Time => args.add(None::<NaiveTime>),
        ColumnKind::Json => args.add(None::<Json<Value>>),
    }
}
