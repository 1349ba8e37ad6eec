//! Convenience result type alias for MediDir.

use crate::error::AppError;

/// A specialized `Result` type for MediDir operations.
pub type AppResult<T> = Result<T, AppError>;
