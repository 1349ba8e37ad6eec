//! # medidir-entity
//!
//! Domain entity models for the MediDir facility directory. Every struct in
//! this crate is a table row: it derives `Serialize`, `Deserialize`, and
//! `sqlx::FromRow`, declares its columns with `define_columns!`, and
//! implements [`medidir_core::traits::Entity`] so the generic repository
//! engine can store it.

mod checks;
mod text_enum;

pub mod appointment;
pub mod audit;
pub mod category;
pub mod certification;
pub mod city;
pub mod department;
pub mod doctor;
pub mod equipment;
pub mod facility;
pub mod insurance;
pub mod operating_hours;
pub mod plan;
pub mod review;
pub mod session;
pub mod user;
pub mod verification;

pub use appointment::{AppointmentStatus, FacilityAppointment};
pub use audit::AuditLog;
pub use category::FacilityCategory;
pub use certification::FacilityCertification;
pub use city::City;
pub use department::FacilityDepartment;
pub use doctor::Doctor;
pub use equipment::FacilityEquipment;
pub use facility::{Facility, FacilityType};
pub use insurance::{FacilityInsuranceProvider, InsuranceProvider};
pub use operating_hours::FacilityOperatingHours;
pub use plan::{FacilityPlan, Plan};
pub use review::Review;
pub use session::Session;
pub use user::User;
pub use verification::VerificationToken;
