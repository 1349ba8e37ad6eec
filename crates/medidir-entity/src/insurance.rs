//! Insurance providers and the facilities that accept them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// An insurance company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct InsuranceProvider {
    pub id: i64,
    pub name: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `insurance_providers`.
    pub enum InsuranceProviderColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        ContactPhone => ("contact_phone", Text, true),
        ContactEmail => ("contact_email", Text, true),
        Website => ("website", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for InsuranceProvider {
    type Column = InsuranceProviderColumn;
    const TABLE: &'static str = "insurance_providers";
    const LABEL: &'static str = "Insurance provider";

    fn insert_values(&self) -> Vec<(InsuranceProviderColumn, FieldValue)> {
        use InsuranceProviderColumn as C;
        vec![
            (C::Name, self.name.clone().into()),
            (C::ContactPhone, self.contact_phone.clone().into()),
            (C::ContactEmail, self.contact_email.clone().into()),
            (C::Website, self.website.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)
    }
}

/// Link between a facility and an insurance provider it accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityInsuranceProvider {
    pub id: i64,
    pub facility_id: i64,
    pub insurance_provider_id: i64,
    /// Free-form coverage terms.
    pub coverage_details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_insurance_providers`.
    pub enum FacilityInsuranceProviderColumn {
        Id => ("id", BigInt, false),
        FacilityId => ("facility_id", BigInt, false),
        InsuranceProviderId => ("insurance_provider_id", BigInt, false),
        CoverageDetails => ("coverage_details", Json, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for FacilityInsuranceProvider {
    type Column = FacilityInsuranceProviderColumn;
    const TABLE: &'static str = "facility_insurance_providers";
    const LABEL: &'static str = "Facility insurance provider";

    fn insert_values(&self) -> Vec<(FacilityInsuranceProviderColumn, FieldValue)> {
        use FacilityInsuranceProviderColumn as C;
        let coverage = if self.coverage_details.is_null() {
            Value::Object(Default::default())
        } else {
            self.coverage_details.clone()
        };
        vec![
            (C::FacilityId, self.facility_id.into()),
            (C::InsuranceProviderId, self.insurance_provider_id.into()),
            (C::CoverageDetails, coverage.into()),
        ]
    }
}
