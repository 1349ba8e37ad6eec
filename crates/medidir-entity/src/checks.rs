//! Small field checks shared by `Entity::validate` implementations.

use medidir_core::{AppError, AppResult};

pub(crate) fn required(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("field '{field}' is required")));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, value: f64) -> AppResult<()> {
    if value < 0.0 || value.is_nan() {
        return Err(AppError::validation(format!(
            "field '{field}' must not be negative"
        )));
    }
    Ok(())
}

pub(crate) fn in_range(field: &str, value: f64, min: f64, max: f64) -> AppResult<()> {
    if !(min..=max).contains(&value) {
        return Err(AppError::validation(format!(
            "field '{field}' must be between {min} and {max}"
        )));
    }
    Ok(())
}
