//! Custom Axum extractors.

pub mod auth;
pub mod filter;
pub mod json;

pub use auth::AuthUser;
pub use filter::QueryFilter;
pub use json::{JsonBody, ValidatedJson};
