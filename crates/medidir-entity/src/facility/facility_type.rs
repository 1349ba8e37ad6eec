//! Facility type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::text_enum::text_enum;

/// The closed set of facility kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityType {
    #[serde(rename = "Public Hospital")]
    PublicHospital,
    #[serde(rename = "Teaching Hospital")]
    TeachingHospital,
    #[serde(rename = "Private Hospital")]
    PrivateHospital,
    #[serde(rename = "Rehabilitation Center")]
    RehabilitationCenter,
    #[serde(rename = "Medical Complex")]
    MedicalComplex,
    #[default]
    Clinic,
    Pharmacy,
    Laboratory,
    #[serde(rename = "Imaging Center")]
    ImagingCenter,
}

impl FacilityType {
    /// Every variant, in storage order.
    pub const ALL: [FacilityType; 9] = [
        Self::PublicHospital,
        Self::TeachingHospital,
        Self::PrivateHospital,
        Self::RehabilitationCenter,
        Self::MedicalComplex,
        Self::Clinic,
        Self::Pharmacy,
        Self::Laboratory,
        Self::ImagingCenter,
    ];

    /// Return the stored display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicHospital => "Public Hospital",
            Self::TeachingHospital => "Teaching Hospital",
            Self::PrivateHospital => "Private Hospital",
            Self::RehabilitationCenter => "Rehabilitation Center",
            Self::MedicalComplex => "Medical Complex",
            Self::Clinic => "Clinic",
            Self::Pharmacy => "Pharmacy",
            Self::Laboratory => "Laboratory",
            Self::ImagingCenter => "Imaging Center",
        }
    }

    /// Whether this kind of facility admits inpatients.
    pub fn is_hospital(&self) -> bool {
        matches!(
            self,
            Self::PublicHospital | Self::TeachingHospital | Self::PrivateHospital
        )
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = medidir_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                medidir_core::AppError::validation(format!("Invalid facility type: '{s}'"))
            })
    }
}

text_enum!(FacilityType);
