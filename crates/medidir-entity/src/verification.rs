//! Single-use verification token entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;

/// A one-time token bound to an identifier such as an email address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct VerificationToken {
    pub id: i64,
    pub identifier: String,
    pub token: String,
    pub expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `verification_tokens`.
    pub enum VerificationTokenColumn {
        Id => ("id", BigInt, false),
        Identifier => ("identifier", Text, false),
        Token => ("token", Text, false),
        Expires => ("expires", Timestamp, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl VerificationToken {
    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

impl Entity for VerificationToken {
    type Column = VerificationTokenColumn;
    const TABLE: &'static str = "verification_tokens";
    const LABEL: &'static str = "Verification token";

    fn insert_values(&self) -> Vec<(VerificationTokenColumn, FieldValue)> {
        vec![
            (VerificationTokenColumn::Identifier, self.identifier.clone().into()),
            (VerificationTokenColumn::Token, self.token.clone().into()),
            (VerificationTokenColumn::Expires, self.expires.into()),
        ]
    }
}
