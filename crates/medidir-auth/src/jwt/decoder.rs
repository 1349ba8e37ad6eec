//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use medidir_core::config::AuthConfig;
use medidir_core::error::AppError;

use super::claims::Claims;

/// Validates bearer tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verify signature and expiry and return the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication("Invalid token"),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;

    #[test]
    fn test_garbage_is_invalid_format() {
        let decoder = JwtDecoder::new(&AuthConfig::default());
        let err = decoder.decode("not-a-token").unwrap_err();
        assert_eq!(err.kind, medidir_core::error::ErrorKind::Authentication);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = AuthConfig {
            jwt_secret: "one".to_string(),
            ..AuthConfig::default()
        };
        let verifier = AuthConfig {
            jwt_secret: "two".to_string(),
            ..AuthConfig::default()
        };
        let issued = JwtEncoder::new(&issuer).issue(1).unwrap();
        let err = JwtDecoder::new(&verifier).decode(&issued.token).unwrap_err();
        assert_eq!(err.message, "Invalid token signature");
    }
}
