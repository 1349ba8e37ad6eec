//! User account entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;
use medidir_core::{AppError, AppResult};

use crate::checks;

/// A registered user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Argon2 password hash (PHC string).
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    /// When the email address was confirmed.
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `users`.
    pub enum UserColumn {
        Id => ("id", BigInt, false),
        Name => ("name", Text, false),
        Email => ("email", Text, true),
        PhoneNumber => ("phone_number", Text, true),
        Password => ("password", Text, false),
        EmailVerified => ("email_verified", Timestamp, true),
        Image => ("image", Text, true),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Entity for User {
    type Column = UserColumn;
    const TABLE: &'static str = "users";
    const LABEL: &'static str = "User";

    fn insert_values(&self) -> Vec<(UserColumn, FieldValue)> {
        vec![
            (UserColumn::Name, self.name.clone().into()),
            (UserColumn::Email, self.email.clone().into()),
            (UserColumn::PhoneNumber, self.phone_number.clone().into()),
            (UserColumn::Password, self.password_hash.clone().into()),
            (UserColumn::EmailVerified, self.email_verified.into()),
            (UserColumn::Image, self.image.clone().into()),
        ]
    }

    fn validate(&self) -> AppResult<()> {
        checks::required("password", &self.password_hash)?;
        if self.email.is_none() && self.phone_number.is_none() {
            return Err(AppError::validation(
                "either 'email' or 'phone_number' is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User {
            email: Some("a@b.com".to_string()),
            password_hash: "$argon2id$v=19$secret".to_string(),
            ..User::default()
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
