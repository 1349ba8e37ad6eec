//! Subscription plans and facility subscriptions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::{AppError, AppResult};

use crate::checks;

/// A listing plan facilities can subscribe to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub monthly_price: f64,
    pub yearly_price: f64,
    pub description: Option<String>,
    /// Feature flags or limits included in the plan.
    pub features: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `plans`.
    pub enum PlanColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        MonthlyPrice => ("monthly_price", Double, false),
        YearlyPrice => ("yearly_price", Double, false),
        Description => ("description", Text, true),
        Features => ("features", Json, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for Plan {
    type Column = PlanColumn;
    const TABLE: &'static str = "plans";
    const LABEL: &'static str = "Plan";

    fn insert_values(&self) -> Vec<(PlanColumn, FieldValue)> {
        let features = if self.features.is_null() {
            Value::Object(Default::default())
        } else {
            self.features.clone()
        };
        vec![
            (PlanColumn::Name, self.name.clone().into()),
            (PlanColumn::MonthlyPrice, self.monthly_price.into()),
            (PlanColumn::YearlyPrice, self.yearly_price.into()),
            (PlanColumn::Description, self.description.clone().into()),
            (PlanColumn::Features, features.into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)?;
        checks::non_negative("monthly_price", self.monthly_price)?;
        checks::non_negative("yearly_price", self.yearly_price)
    }
}

/// A facility's subscription to a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityPlan {
    pub id: i64,
    pub facility_id: i64,
    pub plan_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_plans`.
    pub enum FacilityPlanColumn {
        Id => ("id", BigInt, false),
        FacilityId => ("facility_id", BigInt, false),
        PlanId => ("plan_id", BigInt, false),
        StartDate => ("start_date", Date, false),
        EndDate => ("end_date", Date, true),
        IsActive => ("is_active", Boolean, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for FacilityPlan {
    type Column = FacilityPlanColumn;
    const TABLE: &'static str = "facility_plans";
    const LABEL: &'static str = "Facility plan";

    fn insert_values(&self) -> Vec<(FacilityPlanColumn, FieldValue)> {
        use FacilityPlanColumn as C;
        vec![
            (C::FacilityId, self.facility_id.into()),
            (C::PlanId, self.plan_id.into()),
            (C::StartDate, self.start_date.into()),
            (C::EndDate, self.end_date.into()),
            (C::IsActive, self.is_active.into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        match self.end_date {
            Some(end) if end < self.start_date => Err(AppError::validation(
                "field 'end_date' must not precede 'start_date'",
            )),
            _ => Ok(()),
        }
    }
}
