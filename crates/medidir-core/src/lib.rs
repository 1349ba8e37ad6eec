//! # medidir-core
//!
//! Core crate for the MediDir facility directory. Contains the generic
//! repository contract, configuration schemas, typed column descriptors,
//! filters and change-sets, and the unified error system.
//!
//! This crate has **no** internal dependencies on other MediDir crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
