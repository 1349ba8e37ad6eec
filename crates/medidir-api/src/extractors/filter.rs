//! Equality filters from the query string.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use medidir_core::error::AppError;
use medidir_core::types::{Column, Filter};

/// `?name=Springfield&timezone=UTC` as a typed filter. Unknown columns and
/// values that do not parse as the column's type are rejected.
#[derive(Debug, Clone)]
pub struct QueryFilter<C: Column>(pub Filter<C>);

impl<S, C> FromRequestParts<S> for QueryFilter<C>
where
    S: Send + Sync,
    C: Column,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        Filter::from_query(&params).map(Self)
    }
}
