//! Doctor entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// A practitioner, optionally attached to a primary facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub primary_facility_id: Option<i64>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `doctors`.
    pub enum DoctorColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        Specialty => ("specialty", Text, false),
        PrimaryFacilityId => ("primary_facility_id", BigInt, true),
        ContactNumber => ("contact_number", Text, true),
        Email => ("email", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for Doctor {
    type Column = DoctorColumn;
    const TABLE: &'static str = "doctors";
    const LABEL: &'static str = "Doctor";

    fn insert_values(&self) -> Vec<(DoctorColumn, FieldValue)> {
        vec![
            (DoctorColumn::Name, self.name.clone().into()),
            (DoctorColumn::Specialty, self.specialty.clone().into()),
            (DoctorColumn::PrimaryFacilityId, self.primary_facility_id.into()),
            (DoctorColumn::ContactNumber, self.contact_number.clone().into()),
            (DoctorColumn::Email, self.email.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)?;
        checks::required("specialty", &self.specialty)
    }
}
