//! Core type definitions used across the MediDir workspace.

pub mod column;
pub mod filter;
pub mod response;
pub mod value;

pub use column::{Column, ColumnKind};
pub use filter::{Changes, Filter};
pub use response::ApiErrorResponse;
pub use value::FieldValue;
