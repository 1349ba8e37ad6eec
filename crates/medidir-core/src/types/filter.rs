//! Equality filters and partial-update change-sets for dynamic queries.
//!
//! Both are ordered lists of `(column, value)` pairs over one entity's
//! column enumeration. Values are coerced to the column's storage type on
//! insertion, so a constructed filter or change-set always binds cleanly.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::column::Column;
use crate::types::value::FieldValue;

/// A conjunction of equality conditions. An empty filter matches every row.
///
/// A [`FieldValue::Null`] condition matches rows where the column IS NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<C: Column> {
    conditions: Vec<(C, FieldValue)>,
}

impl<C: Column> Default for Filter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Column> Filter<C> {
    /// An empty filter.
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Add `column = value` to the conjunction.
    pub fn eq(mut self, column: C, value: impl Into<FieldValue>) -> AppResult<Self> {
        let value = value
            .into()
            .coerce(column.kind())
            .map_err(|e| field_error(column.name(), e))?;
        self.conditions.push((column, value));
        Ok(self)
    }

    /// Build a filter from query-string pairs. Unknown keys are rejected.
    pub fn from_query(params: &HashMap<String, String>) -> AppResult<Self> {
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        let mut filter = Self::new();
        for key in keys {
            let column = lookup::<C>(key)?;
            let value = FieldValue::from_text(column.kind(), &params[key])
                .map_err(|e| field_error(key, e))?;
            filter.conditions.push((column, value));
        }
        Ok(filter)
    }

    /// Build a filter from a JSON object. `null` members become IS NULL.
    pub fn from_json(object: &Map<String, Value>) -> AppResult<Self> {
        let mut filter = Self::new();
        for (key, raw) in object {
            let column = lookup::<C>(key)?;
            let value =
                FieldValue::from_json(column.kind(), raw).map_err(|e| field_error(key, e))?;
            filter.conditions.push((column, value));
        }
        Ok(filter)
    }

    /// The conditions in insertion order.
    pub fn conditions(&self) -> &[(C, FieldValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// A partial update: the columns to assign and their new values.
///
/// Only writable columns are accepted, each at most once, and NULL only
/// for nullable columns. `updated_at` is refreshed by storage, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct Changes<C: Column> {
    assignments: Vec<(C, FieldValue)>,
}

impl<C: Column> Default for Changes<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Column> Changes<C> {
    /// An empty change-set.
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Assign `value` to `column`.
    pub fn set(mut self, column: C, value: impl Into<FieldValue>) -> AppResult<Self> {
        self.push(column, value.into())?;
        Ok(self)
    }

    /// Build a change-set from a JSON object such as a PATCH body.
    pub fn from_json(object: &Map<String, Value>) -> AppResult<Self> {
        let mut changes = Self::new();
        for (key, raw) in object {
            let column = lookup::<C>(key)?;
            let value =
                FieldValue::from_json(column.kind(), raw).map_err(|e| field_error(key, e))?;
            changes.push(column, value)?;
        }
        Ok(changes)
    }

    fn push(&mut self, column: C, value: FieldValue) -> AppResult<()> {
        let name = column.name();
        if !column.is_writable() {
            return Err(AppError::validation(format!(
                "field '{name}' is managed by storage and cannot be changed"
            )));
        }
        if self.assignments.iter().any(|(c, _)| *c == column) {
            return Err(AppError::validation(format!("field '{name}' is assigned twice")));
        }
        let value = value
            .coerce(column.kind())
            .map_err(|e| field_error(name, e))?;
        if value.is_null() && !column.nullable() {
            return Err(AppError::validation(format!("field '{name}' cannot be null")));
        }
        self.assignments.push((column, value));
        Ok(())
    }

    /// The assignments in insertion order.
    pub fn assignments(&self) -> &[(C, FieldValue)] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }
}

fn lookup<C: Column>(key: &str) -> AppResult<C> {
    C::from_name(key).ok_or_else(|| AppError::validation(format!("unknown field '{key}'")))
}

fn field_error(field: &str, err: AppError) -> AppError {
    AppError::validation(format!("field '{field}': {}", err.message))
}
