//! Typed values carried by filters and change-sets.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

use crate::error::AppError;
use crate::types::column::ColumnKind;

/// A single value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Json(Value),
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "number",
            Self::Text(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Json(_) => "json",
        }
    }

    /// Convert this value into the representation a column of `kind` stores.
    ///
    /// Integers widen to doubles, and strings parse into timestamps, dates
    /// and times. Anything can be stored in a JSON column. NULL passes
    /// through; nullability is checked by the caller.
    pub fn coerce(self, kind: ColumnKind) -> Result<Self, AppError> {
        let mismatch = |value: &Self| {
            AppError::validation(format!(
                "expected {kind}, got {}",
                value.type_name()
            ))
        };

        match (kind, self) {
            (_, Self::Null) => Ok(Self::Null),
            (ColumnKind::BigInt, v @ Self::Int(_)) => Ok(v),
            (ColumnKind::Integer, Self::Int(i)) => i32::try_from(i)
                .map(|_| Self::Int(i))
                .map_err(|_| AppError::validation(format!("{i} is out of range for integer"))),
            (ColumnKind::Double, Self::Int(i)) => Ok(Self::Float(i as f64)),
            (ColumnKind::Double, v @ Self::Float(_)) => Ok(v),
            (ColumnKind::Boolean, v @ Self::Bool(_)) => Ok(v),
            (ColumnKind::Text, v @ Self::Text(_)) => Ok(v),
            (ColumnKind::Timestamp, v @ Self::Timestamp(_)) => Ok(v),
            (ColumnKind::Timestamp, Self::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|t| Self::Timestamp(t.with_timezone(&Utc)))
                .map_err(|_| AppError::validation(format!("'{s}' is not an RFC 3339 timestamp"))),
            (ColumnKind::Date, v @ Self::Date(_)) => Ok(v),
            (ColumnKind::Date, Self::Text(s)) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|_| AppError::validation(format!("'{s}' is not a YYYY-MM-DD date"))),
            (ColumnKind::Time, v @ Self::Time(_)) => Ok(v),
            (ColumnKind::Time, Self::Text(s)) => parse_time(&s)
                .map(Self::Time)
                .ok_or_else(|| AppError::validation(format!("'{s}' is not an HH:MM[:SS] time"))),
            (ColumnKind::Json, v) => Ok(Self::Json(v.to_json())),
            (_, v) => Err(mismatch(&v)),
        }
    }

    /// Build a value for a column of `kind` from a JSON document value.
    pub fn from_json(kind: ColumnKind, value: &Value) -> Result<Self, AppError> {
        let raw = match (kind, value) {
            (_, Value::Null) => Self::Null,
            (ColumnKind::Json, v) => Self::Json(v.clone()),
            (_, Value::Bool(b)) => Self::Bool(*b),
            (_, Value::Number(n)) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            (_, Value::String(s)) => Self::Text(s.clone()),
            (_, other) => {
                return Err(AppError::validation(format!(
                    "expected {kind}, got {}",
                    json_type_name(other)
                )));
            }
        };
        raw.coerce(kind)
    }

    /// Build a value for a column of `kind` from a query-string parameter.
    pub fn from_text(kind: ColumnKind, text: &str) -> Result<Self, AppError> {
        let invalid = || AppError::validation(format!("'{text}' is not a valid {kind}"));
        let raw = match kind {
            ColumnKind::BigInt | ColumnKind::Integer => {
                Self::Int(text.parse().map_err(|_| invalid())?)
            }
            ColumnKind::Double => Self::Float(text.parse().map_err(|_| invalid())?),
            ColumnKind::Boolean => Self::Bool(text.parse().map_err(|_| invalid())?),
            ColumnKind::Json => {
                Self::Json(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
            }
            ColumnKind::Text | ColumnKind::Timestamp | ColumnKind::Date | ColumnKind::Time => {
                Self::Text(text.to_string())
            }
        };
        raw.coerce(kind)
    }

    /// JSON rendering of the value, as it appears in a serialized entity.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Text(s) => Value::String(s.clone()),
            Self::Timestamp(t) => serde_json::to_value(t).unwrap_or(Value::Null),
            Self::Date(d) => serde_json::to_value(d).unwrap_or(Value::Null),
            Self::Time(t) => serde_json::to_value(t).unwrap_or(Value::Null),
            Self::Json(v) => v.clone(),
        }
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
