//! Facility operations beyond generic CRUD.

pub mod service;

pub use service::{FacilityRepositories, FacilityService};
