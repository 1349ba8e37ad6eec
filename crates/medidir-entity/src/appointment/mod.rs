//! Appointment domain entities.

pub mod model;
pub mod status;

pub use model::{FacilityAppointment, FacilityAppointmentColumn};
pub use status::AppointmentStatus;
