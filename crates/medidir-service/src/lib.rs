//! # medidir-service
//!
//! Business logic layer for MediDir. Services hold their repositories as
//! `Arc<dyn Repository<T>>` trait objects, so production wiring passes the
//! PostgreSQL repositories and tests pass in-memory ones.

pub mod auth;
pub mod directory;
pub mod facility;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthService, LoginResult, RegisterUser};
pub use directory::DirectoryService;
pub use facility::{FacilityRepositories, FacilityService};
