//! Facility operating hours entity.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::{AppError, AppResult};

/// Opening window of a facility, or one of its departments, on one weekday.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityOperatingHours {
    pub id: i64,
    pub facility_id: i64,
    pub department_id: Option<i64>,
    /// 0 = Sunday through 6 = Saturday.
    pub day_of_week: i32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_operating_hours`.
    pub enum FacilityOperatingHoursColumn {
        Id => ("id", BigInt, false),
        FacilityId => ("facility_id", BigInt, false),
        DepartmentId => ("department_id", BigInt, true),
        DayOfWeek => ("day_of_week", Integer, false),
        StartTime => ("start_time", Time, true),
        EndTime => ("end_time", Time, true),
        IsClosed => ("is_closed", Boolean, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl FacilityOperatingHours {
    /// Whether the window covers `time`. Closed days cover nothing.
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        if self.is_closed {
            return false;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start <= end => start <= time && time < end,
            // Overnight window, e.g. 22:00 to 06:00.
            (Some(start), Some(end)) => time >= start || time < end,
            _ => false,
        }
    }
}

impl Entity for FacilityOperatingHours {
    type Column = FacilityOperatingHoursColumn;
    const TABLE: &'static str = "facility_operating_hours";
    const LABEL: &'static str = "Operating hours";

    fn insert_values(&self) -> Vec<(FacilityOperatingHoursColumn, FieldValue)> {
        use FacilityOperatingHoursColumn as C;
        vec![
            (C::FacilityId, self.facility_id.into()),
            (C::DepartmentId, self.department_id.into()),
            (C::DayOfWeek, self.day_of_week.into()),
            (C::StartTime, self.start_time.into()),
            (C::EndTime, self.end_time.into()),
            (C::IsClosed, self.is_closed.into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(AppError::validation(
                "field 'day_of_week' must be between 0 and 6",
            ));
        }
        if !self.is_closed && (self.start_time.is_none() || self.end_time.is_none()) {
            return Err(AppError::validation(
                "open days need both 'start_time' and 'end_time'",
            ));
        }
        Ok(())
    }
}
