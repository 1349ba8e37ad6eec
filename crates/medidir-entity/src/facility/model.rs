//! Facility entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use super::facility_type::FacilityType;
use crate::checks;

/// A hospital, clinic, pharmacy, or other care site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub facility_type: FacilityType,
    pub category_id: Option<i64>,
    pub city_id: Option<i64>,
    /// Street address.
    pub location: Option<String>,
    /// `"lat,lng"` pair.
    pub coordinates: Option<String>,
    pub phone: Option<String>,
    pub emergency_phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    /// Average review rating, 0 to 5.
    pub rating: f64,
    pub bed_capacity: i64,
    pub is_24_hours: bool,
    pub has_emergency: bool,
    pub has_parking: bool,
    pub has_ambulance: bool,
    pub accepts_insurance: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// JSON array of amenity names.
    pub amenities: Option<Value>,
    /// JSON array of accreditation names.
    pub accreditations: Option<Value>,
    pub meta_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facilities`.
    pub enum FacilityColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        FacilityType => ("type", Text, false),
        CategoryId => ("category_id", BigInt, true),
        CityId => ("city_id", BigInt, true),
        Location => ("location", Text, true),
        Coordinates => ("coordinates", Text, true),
        Phone => ("phone", Text, true),
        EmergencyPhone => ("emergency_phone", Text, true),
        Email => ("email", Text, true),
        Website => ("website", Text, true),
        Rating => ("rating", Double, false),
        BedCapacity => ("bed_capacity", BigInt, false),
        Is24Hours => ("is_24_hours", Boolean, false),
        HasEmergency => ("has_emergency", Boolean, false),
        HasParking => ("has_parking", Boolean, false),
        HasAmbulance => ("has_ambulance", Boolean, false),
        AcceptsInsurance => ("accepts_insurance", Boolean, false),
        Description => ("description", Text, true),
        ImageUrl => ("image_url", Text, true),
        Amenities => ("amenities", Json, true),
        Accreditations => ("accreditations", Json, true),
        MetaData => ("meta_data", Json, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for Facility {
    type Column = FacilityColumn;
    const TABLE: &'static str = "facilities";
    const LABEL: &'static str = "Facility";

    fn insert_values(&self) -> Vec<(FacilityColumn, FieldValue)> {
        use FacilityColumn as C;
        vec![
            (C::Name, self.name.clone().into()),
            (C::FacilityType, self.facility_type.into()),
            (C::CategoryId, self.category_id.into()),
            (C::CityId, self.city_id.into()),
            (C::Location, self.location.clone().into()),
            (C::Coordinates, self.coordinates.clone().into()),
            (C::Phone, self.phone.clone().into()),
            (C::EmergencyPhone, self.emergency_phone.clone().into()),
            (C::Email, self.email.clone().into()),
            (C::Website, self.website.clone().into()),
            (C::Rating, self.rating.into()),
            (C::BedCapacity, self.bed_capacity.into()),
            (C::Is24Hours, self.is_24_hours.into()),
            (C::HasEmergency, self.has_emergency.into()),
            (C::HasParking, self.has_parking.into()),
            (C::HasAmbulance, self.has_ambulance.into()),
            (C::AcceptsInsurance, self.accepts_insurance.into()),
            (C::Description, self.description.clone().into()),
            (C::ImageUrl, self.image_url.clone().into()),
            (C::Amenities, self.amenities.clone().into()),
            (C::Accreditations, self.accreditations.clone().into()),
            (C::MetaData, self.meta_data.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)?;
        checks::in_range("rating", self.rating, 0.0, 5.0)?;
        checks::non_negative("bed_capacity", self.bed_capacity as f64)
    }
}
