//! Facility certification entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// A certification or license held by a facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityCertification {
    pub id: i64,
    pub facility_id: i64,
    pub name: String,
    pub issuing_authority: String,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: String,
    pub document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_certifications`.
    pub enum FacilityCertificationColumn {
        Id => ("id", BigInt, false),
        FacilityId => ("facility_id", BigInt, false),
        Name => ("name", Text, false),
        IssuingAuthority => ("issuing_authority", Text, false),
        IssueDate => ("issue_date", Date, true),
        ExpiryDate => ("expiry_date", Date, true),
        Status => ("status", Text, false),
        DocumentUrl => ("document_url", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl FacilityCertification {
    /// Whether the certification has lapsed as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < today)
    }
}

impl Entity for FacilityCertification {
    type Column = FacilityCertificationColumn;
    const TABLE: &'static str = "facility_certifications";
    const LABEL: &'static str = "Certification";

    fn insert_values(&self) -> Vec<(FacilityCertificationColumn, FieldValue)> {
        use FacilityCertificationColumn as C;
        vec![
            (C::FacilityId, self.facility_id.into()),
            (C::Name, self.name.clone().into()),
            (C::IssuingAuthority, self.issuing_authority.clone().into()),
            (C::IssueDate, self.issue_date.into()),
            (C::ExpiryDate, self.expiry_date.into()),
            (C::Status, self.status.clone().into()),
            (C::DocumentUrl, self.document_url.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)?;
        checks::required("issuing_authority", &self.issuing_authority)?;
        checks::required("status", &self.status)?;
        if let (Some(issued), Some(expires)) = (self.issue_date, self.expiry_date) {
            if expires < issued {
                return Err(medidir_core::AppError::validation(
                    "field 'expiry_date' must not precede 'issue_date'",
                ));
            }
        }
        Ok(())
    }
}
