//! City entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::AppResult;

use crate::checks;

/// A city that hosts facilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub population: i64,
    pub image_url: Option<String>,
    /// IANA timezone name, e.g. `America/Chicago`.
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `cities`.
    pub enum CityColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        Population => ("population", BigInt, false),
        ImageUrl => ("image_url", Text, true),
        Timezone => ("timezone", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for City {
    type Column = CityColumn;
    const TABLE: &'static str = "cities";
    const LABEL: &'static str = "City";

    fn insert_values(&self) -> Vec<(CityColumn, FieldValue)> {
        vec![
            (CityColumn::Name, self.name.clone().into()),
            (CityColumn::Population, self.population.into()),
            (CityColumn::ImageUrl, self.image_url.clone().into()),
            (CityColumn::Timezone, self.timezone.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("name", &self.name)?;
        checks::non_negative("population", self.population as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_values_skip_storage_columns() {
        let city = City {
            name: "Springfield".to_string(),
            population: 100_000,
            ..City::default()
        };
        let columns: Vec<_> = city.insert_values().into_iter().map(|(c, _)| c).collect();
        assert!(!columns.contains(&CityColumn::Id));
        assert!(!columns.contains(&CityColumn::CreatedAt));
        assert_eq!(columns[0], CityColumn::Name);
    }

    #[test]
    fn test_validate_requires_name() {
        let city = City::default();
        assert!(city.validate().is_err());
    }

    #[test]
    fn test_deserialize_without_storage_fields() {
        let city: City =
            serde_json::from_str(r#"{"name": "Springfield", "population": 100000}"#).unwrap();
        assert_eq!(city.id, 0);
        assert_eq!(city.timezone, None);
    }
}
