//! Review entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// Entity type tag used for facility reviews.
pub const FACILITY_REVIEW: &str = "facility";

/// A rating left on any reviewable record, addressed by `(entity_type, entity_id)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Review {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub user_id: Option<i64>,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `reviews`.
    pub enum ReviewColumn {
        Id => ("id", BigInt, false),
        EntityType => ("entity_type", Text, false),
        EntityId => ("entity_id", BigInt, false),
        UserId => ("user_id", BigInt, true),
        Rating => ("rating", Double, false),
        Comment => ("comment", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for Review {
    type Column = ReviewColumn;
    const TABLE: &'static str = "reviews";
    const LABEL: &'static str = "Review";

    fn insert_values(&self) -> Vec<(ReviewColumn, FieldValue)> {
        vec![
            (ReviewColumn::EntityType, self.entity_type.clone().into()),
            (ReviewColumn::EntityId, self.entity_id.into()),
            (ReviewColumn::UserId, self.user_id.into()),
            (ReviewColumn::Rating, self.rating.into()),
            (ReviewColumn::Comment, self.comment.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("entity_type", &self.entity_type)?;
        checks::in_range("rating", self.rating, 0.0, 5.0)
    }
}
