//! Facility domain entities.

pub mod facility_type;
pub mod model;

pub use facility_type::FacilityType;
pub use model::{Facility, FacilityColumn};
