//! Route handlers organized by domain.

pub mod audit;
pub mod auth;
pub mod directory;
pub mod facility;
pub mod health;
pub mod metrics;
