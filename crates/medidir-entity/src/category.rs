//! Facility category entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// A node in the facility category tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Parent category, `None` for roots.
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_categories`.
    pub enum FacilityCategoryColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        Description => ("description", Text, true),
        ParentId => ("parent_id", BigInt, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for FacilityCategory {
    type Column = FacilityCategoryColumn;
    const TABLE: &'static str = "facility_categories";
    const LABEL: &'static str = "Facility category";

    fn insert_values(&self) -> Vec<(FacilityCategoryColumn, FieldValue)> {
        vec![
            (FacilityCategoryColumn::Name, self.name.clone().into()),
            (FacilityCategoryColumn::Description, self.description.clone().into()),
            (FacilityCategoryColumn::ParentId, self.parent_id.into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)
    }
}
