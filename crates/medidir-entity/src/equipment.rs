//! Facility equipment entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// A piece of equipment and its maintenance schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityEquipment {
    pub id: i64,
    pub facility_id: i64,
    pub department_id: Option<i64>,
    pub name: String,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    /// Free-form operational status, e.g. `operational` or `under repair`.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_equipment`.
    pub enum FacilityEquipmentColumn {
        Id => ("id", BigInt, false),
        FacilityId => ("facility_id", BigInt, false),
        DepartmentId => ("department_id", BigInt, true),
        Name => ("name", Text, false),
        Model => ("model", Text, true),
        Manufacturer => ("manufacturer", Text, true),
        PurchaseDate => ("purchase_date", Date, true),
        LastMaintenanceDate => ("last_maintenance_date", Date, true),
        NextMaintenanceDate => ("next_maintenance_date", Date, true),
        Status => ("status", Text, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl FacilityEquipment {
    /// Whether scheduled maintenance is due on or before `today`.
    pub fn maintenance_due(&self, today: NaiveDate) -> bool {
        self.next_maintenance_date.is_some_and(|d| d <= today)
    }
}

impl Entity for FacilityEquipment {
    type Column = FacilityEquipmentColumn;
    const TABLE: &'static str = "facility_equipment";
    const LABEL: &'static str = "Equipment";

    fn insert_values(&self) -> Vec<(FacilityEquipmentColumn, FieldValue)> {
        use FacilityEquipmentColumn as C;
        vec![
            (C::FacilityId, self.facility_id.into()),
            (C::DepartmentId, self.department_id.into()),
            (C::Name, self.name.clone().into()),
            (C::Model, self.model.clone().into()),
            (C::Manufacturer, self.manufacturer.clone().into()),
            (C::PurchaseDate, self.purchase_date.into()),
            (C::LastMaintenanceDate, self.last_maintenance_date.into()),
            (C::NextMaintenanceDate, self.next_maintenance_date.into()),
            (C::Status, self.status.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)?;
        checks::required("status", &self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintenance_due() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut item = FacilityEquipment {
            next_maintenance_date: NaiveDate::from_ymd_opt(2024, 5, 30),
            ..FacilityEquipment::default()
        };
        assert!(item.maintenance_due(today));
        item.next_maintenance_date = None;
        assert!(!item.maintenance_due(today));
    }
}
