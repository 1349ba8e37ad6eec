//! JWT token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use medidir_core::config::AuthConfig;
use medidir_core::error::AppError;

use super::claims::Claims;
use crate::token::generate_token;

/// Creates signed HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl", &self.ttl).finish()
    }
}

/// A freshly signed token and the claims it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    /// Token id, stored as the session token.
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Issue a token for `user_id` valid for the configured TTL.
    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            jti: generate_token(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))?;

        Ok(IssuedToken {
            token,
            jti: claims.jti,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtDecoder;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_token_has_three_segments() {
        let issued = JwtEncoder::new(&config()).issue(7).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
        assert!(!issued.jti.is_empty());
    }

    #[test]
    fn test_round_trip_claims() {
        let config = config();
        let issued = JwtEncoder::new(&config).issue(7).unwrap();
        let claims = JwtDecoder::new(&config).decode(&issued.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config();
        let encoder = JwtEncoder::new(&config);
        let issued = encoder
            .issue_at(7, Utc::now() - Duration::hours(48))
            .unwrap();
        let err = JwtDecoder::new(&config).decode(&issued.token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }
}
