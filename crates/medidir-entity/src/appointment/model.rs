//! Facility appointment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use super::status::AppointmentStatus;
use crate::checks;

/// A patient appointment with a doctor at a facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct FacilityAppointment {
    pub id: i64,
    pub patient_name: String,
    pub patient_contact: String,
    pub facility_id: i64,
    pub doctor_id: i64,
    pub appointment_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason_for_appointment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `facility_appointments`.
    pub enum FacilityAppointmentColumn {
        Id => ("id", BigInt, false),
        PatientName => ("patient_name", Text, false),
        PatientContact => ("patient_contact", Text, false),
        FacilityId => ("facility_id", BigInt, false),
        DoctorId => ("doctor_id", BigInt, false),
        AppointmentTime => ("appointment_time", Timestamp, false),
        Status => ("status", Text, false),
        ReasonForAppointment => ("reason_for_appointment", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for FacilityAppointment {
    type Column = FacilityAppointmentColumn;
    const TABLE: &'static str = "facility_appointments";
    const LABEL: &'static str = "Appointment";

    fn insert_values(&self) -> Vec<(FacilityAppointmentColumn, FieldValue)> {
        use FacilityAppointmentColumn as C;
        vec![
            (C::PatientName, self.patient_name.clone().into()),
            (C::PatientContact, self.patient_contact.clone().into()),
            (C::FacilityId, self.facility_id.into()),
            (C::DoctorId, self.doctor_id.into()),
            (C::AppointmentTime, self.appointment_time.into()),
            (C::Status, self.status.into()),
            (C::ReasonForAppointment, self.reason_for_appointment.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("patient_name", &self.patient_name)?;
        checks::required("patient_contact", &self.patient_contact)
    }
}
