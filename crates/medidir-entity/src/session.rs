//! Login session entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medidir_core::define_columns;
use medidir_core::traits::Entity;
use medidir_core::types::FieldValue;

/// A server-side login session, referenced by the token's `jti` claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub session_token: String,
    pub expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

define_columns! {
    /// Columns of `sessions`.
    pub enum SessionColumn {
        Id => ("id", BigInt, false),
        UserId => ("user_id", BigInt, false),
        SessionToken => ("session_token", Text, false),
        Expires => ("expires", Timestamp, false),
        CreatedAt => ("created_at", Timestamp, false),
        UpdatedAt => ("updated_at", Timestamp, false),
    }
}

impl Session {
    /// Whether the session is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

impl Entity for Session {
    type Column = SessionColumn;
    const TABLE: &'static str = "sessions";
    const LABEL: &'static str = "Session";

    fn insert_values(&self) -> Vec<(SessionColumn, FieldValue)> {
        vec![
            (SessionColumn::UserId, self.user_id.into()),
            (SessionColumn::SessionToken, self.session_token.clone().into()),
            (SessionColumn::Expires, self.expires.into()),
        ]
    }
}
