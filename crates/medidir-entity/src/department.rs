//! Facility department entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// A department inside a facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityDepartment {
    pub id: i64,
    pub facility_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub floor_number: Option<i64>,
    pub head_doctor_id: Option<i64>,
    pub contact_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_departments`.
    pub enum FacilityDepartmentColumn {
        Id => ("id", BigInt, false),
        FacilityId => ("facility_id", BigInt, false),
        Name => ("name", Text, false),
        Description => ("description", Text, true),
        FloorNumber => ("floor_number", BigInt, true),
        HeadDoctorId => ("head_doctor_id", BigInt, true),
        ContactNumber => ("contact_number", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for FacilityDepartment {
    type Column = FacilityDepartmentColumn;
    const TABLE: &'static str = "facility_departments";
    const LABEL: &'static str = "Department";

    fn insert_values(&self) -> Vec<(FacilityDepartmentColumn, FieldValue)> {
        use FacilityDepartmentColumn as C;
        vec![
            (C::FacilityId, self.facility_id.into()),
            (C::Name, self.name.clone().into()),
            (C::Description, self.description.clone().into()),
            (C::FloorNumber, self.floor_number.into()),
            (C::HeadDoctorId, self.head_doctor_id.into()),
            (C::ContactNumber, self.contact_number.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)
    }
}
