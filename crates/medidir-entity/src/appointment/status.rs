//! Appointment status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::text_enum::text_enum;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    /// Return the stored display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::NoShow => "No-Show",
            Self::Rescheduled => "Rescheduled",
        }
    }

    /// Whether the appointment can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Rescheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = medidir_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            "rescheduled" => Ok(Self::Rescheduled),
            _ => Err(medidir_core::AppError::validation(format!(
                "Invalid appointment status: '{s}'. Expected one of: Scheduled, Completed, Cancelled, No-Show, Rescheduled"
            ))),
        }
    }
}

text_enum!(AppointmentStatus);
