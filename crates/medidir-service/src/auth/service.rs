//! Authentication service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use medidir_auth::jwt::{JwtDecoder, JwtEncoder};
use medidir_auth::password::{PasswordHasher, PasswordValidator};
use medidir_auth::token::generate_token;
use medidir_core::config::AuthConfig;
use medidir_core::error::AppError;
use medidir_core::result::AppResult;
use medidir_core::traits::Repository;
use medidir_core::types::Filter;
use medidir_entity::session::SessionColumn;
use medidir_entity::user::UserColumn;
use medidir_entity::verification::VerificationTokenColumn;
use medidir_entity::{Session, User, VerificationToken};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_TOKEN: &str = "Invalid token";

/// Input for [`AuthService::register`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: String,
    pub image: Option<String>,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Handles accounts, sessions, and verification tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn Repository<User>>,
    sessions: Arc<dyn Repository<Session>>,
    tokens: Arc<dyn Repository<VerificationToken>>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    verification_ttl: Duration,
    /// Verified against when the login names no user, so both failure
    /// paths pay for one Argon2 verification.
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("verification_ttl", &self.verification_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn Repository<User>>,
        sessions: Arc<dyn Repository<Session>>,
        tokens: Arc<dyn Repository<VerificationToken>>,
    ) -> AppResult<Self> {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash_password(&generate_token())?;
        Ok(Self {
            users,
            sessions,
            tokens,
            hasher,
            validator: PasswordValidator::new(config),
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            verification_ttl: Duration::minutes(config.verification_ttl_minutes),
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Create an account. Only the Argon2id hash of the password is stored.
    pub async fn register(&self, req: RegisterUser) -> AppResult<User> {
        let email = normalize(req.email).map(|e| e.to_lowercase());
        let phone_number = normalize(req.phone_number);
        if email.is_none() && phone_number.is_none() {
            return Err(AppError::validation(
                "either 'email' or 'phone_number' is required",
            ));
        }
        self.validator.validate(&req.password)?;

        for login in email.iter().chain(phone_number.iter()) {
            if self.find_by_login(login).await?.is_some() {
                return Err(AppError::conflict("User already exists"));
            }
        }

        let user = User {
            name: req.name.trim().to_string(),
            email,
            phone_number,
            password_hash: self.hasher.hash_password(&req.password)?,
            image: req.image,
            ..User::default()
        };

        let created = self.users.create(&user).await?;
        info!(user_id = created.id, "User registered");
        Ok(created)
    }

    /// Check credentials and open a session.
    ///
    /// An unknown login and a wrong password produce the same error.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<LoginResult> {
        let user = self.find_by_login(login.trim()).await?;

        let Some(user) = user else {
            self.hasher.verify_password(password, &self.dummy_hash)?;
            warn!("Login failed");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login failed");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let issued = self.encoder.issue(user.id)?;
        self.sessions
            .create(&Session {
                user_id: user.id,
                session_token: issued.jti,
                expires: issued.expires_at,
                ..Session::default()
            })
            .await?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginResult {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Resolve a bearer token to its user. The token must verify and its
    /// session must still exist and be unexpired.
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.decoder.decode(token)?;
        let user_id = claims.user_id()?;

        let session = self
            .find_session(&claims.jti)
            .await?
            .filter(|s| s.user_id == user_id)
            .ok_or_else(|| AppError::authentication(INVALID_TOKEN))?;
        if session.is_expired_at(Utc::now()) {
            return Err(AppError::authentication("Token has expired"));
        }

        self.users.find(user_id).await.map_err(|e| {
            if e.is_not_found() {
                AppError::authentication(INVALID_TOKEN)
            } else {
                e
            }
        })
    }

    /// End the token's session. Logging out twice is not an error.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = self.decoder.decode(token)?;
        let filter = Filter::new().eq(SessionColumn::SessionToken, claims.jti)?;
        let removed = self.sessions.delete_many(&filter).await?;
        info!(sub = %claims.sub, sessions = removed.len(), "User logged out");
        Ok(())
    }

    /// Fetch a user by id.
    pub async fn current_user(&self, user_id: i64) -> AppResult<User> {
        self.users.find(user_id).await
    }

    /// Issue a single-use token for `identifier`, valid for `ttl` or the
    /// configured default.
    pub async fn create_verification_token(
        &self,
        identifier: &str,
        ttl: Option<Duration>,
    ) -> AppResult<VerificationToken> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::validation("'identifier' is required"));
        }

        let token = VerificationToken {
            identifier: identifier.to_string(),
            token: generate_token(),
            expires: Utc::now() + ttl.unwrap_or(self.verification_ttl),
            ..VerificationToken::default()
        };
        let created = self.tokens.create(&token).await?;
        info!(identifier, "Verification token created");
        Ok(created)
    }

    /// Consume a verification token. The token is removed whether or not it
    /// has expired, so it can never be used twice. Account rows are left
    /// untouched.
    pub async fn verify_token(&self, identifier: &str, token: &str) -> AppResult<VerificationToken> {
        let identifier = identifier.trim();
        let filter = Filter::new()
            .eq(VerificationTokenColumn::Identifier, identifier)?
            .eq(VerificationTokenColumn::Token, token)?;
        let consumed = self
            .tokens
            .delete_many(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::authentication(INVALID_TOKEN))?;

        if consumed.is_expired_at(Utc::now()) {
            return Err(AppError::authentication("Token has expired"));
        }

        info!(identifier, "Verification token used");
        Ok(consumed)
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let by_email = Filter::new().eq(UserColumn::Email, login.to_lowercase())?;
        if let Some(user) = self.users.find_many(&by_email).await?.into_iter().next() {
            return Ok(Some(user));
        }
        let by_phone = Filter::new().eq(UserColumn::PhoneNumber, login)?;
        Ok(self.users.find_many(&by_phone).await?.into_iter().next())
    }

    async fn find_session(&self, session_token: &str) -> AppResult<Option<Session>> {
        let filter = Filter::new().eq(SessionColumn::SessionToken, session_token)?;
        Ok(self.sessions.find_many(&filter).await?.into_iter().next())
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use medidir_core::error::ErrorKind;

    use super::*;
    use crate::testing::MemoryRepository;

    struct Fixture {
        service: AuthService,
        users: Arc<MemoryRepository<User>>,
        sessions: Arc<MemoryRepository<Session>>,
        tokens: Arc<MemoryRepository<VerificationToken>>,
    }

    fn fixture() -> Fixture {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        };
        let users = Arc::new(MemoryRepository::<User>::new());
        let sessions = Arc::new(MemoryRepository::<Session>::new());
        let tokens = Arc::new(MemoryRepository::<VerificationToken>::new());
        let service =
            AuthService::new(&config, users.clone(), sessions.clone(), tokens.clone()).unwrap();
        Fixture {
            service,
            users,
            sessions,
            tokens,
        }
    }

    fn registration(email: &str) -> RegisterUser {
        RegisterUser {
            name: "Alice".to_string(),
            email: Some(email.to_string()),
            password: "longenough1".to_string(),
            ..RegisterUser::default()
        }
    }

    #[tokio::test]
    async fn test_register_then_login_returns_signed_token() {
        let f = fixture();
        let user = f.service.register(registration("a@b.com")).await.unwrap();
        assert_ne!(user.password_hash, "longenough1");
        assert!(user.password_hash.starts_with("$argon2id$"));

        let result = f.service.login("a@b.com", "longenough1").await.unwrap();
        assert_eq!(result.token.split('.').count(), 3);
        assert_eq!(result.user.id, user.id);
        assert_eq!(f.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let f = fixture();
        f.service.register(registration("a@b.com")).await.unwrap();
        let err = f
            .service
            .register(registration("A@B.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(f.users.len(), 1);
    }

    #[tokio::test]
    async fn test_registration_requires_contact() {
        let f = fixture();
        let err = f
            .service
            .register(RegisterUser {
                name: "Nobody".to_string(),
                password: "longenough1".to_string(),
                ..RegisterUser::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let f = fixture();
        f.service.register(registration("a@b.com")).await.unwrap();

        let unknown = f
            .service
            .login("nobody@b.com", "longenough1")
            .await
            .unwrap_err();
        let wrong = f.service.login("a@b.com", "wrongpassword").await.unwrap_err();

        assert_eq!(unknown.kind, ErrorKind::Authentication);
        assert_eq!(unknown.kind, wrong.kind);
        assert_eq!(unknown.message, wrong.message);
        assert_eq!(f.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_login_by_phone_number() {
        let f = fixture();
        f.service
            .register(RegisterUser {
                name: "Bob".to_string(),
                phone_number: Some("+15550100".to_string()),
                password: "longenough1".to_string(),
                ..RegisterUser::default()
            })
            .await
            .unwrap();
        assert!(f.service.login("+15550100", "longenough1").await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_until_logout() {
        let f = fixture();
        let user = f.service.register(registration("a@b.com")).await.unwrap();
        let login = f.service.login("a@b.com", "longenough1").await.unwrap();

        let resolved = f.service.authenticate(&login.token).await.unwrap();
        assert_eq!(resolved.id, user.id);

        f.service.logout(&login.token).await.unwrap();
        f.service.logout(&login.token).await.unwrap();
        let err = f.service.authenticate(&login.token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_verification_token_is_single_use() {
        let f = fixture();
        let created = f
            .service
            .create_verification_token("a@b.com", None)
            .await
            .unwrap();
        assert!(created.expires > Utc::now());

        f.service
            .verify_token("a@b.com", &created.token)
            .await
            .unwrap();
        let err = f
            .service
            .verify_token("a@b.com", &created.token)
            .await
            .unwrap_err();
        assert_eq!(err.message, INVALID_TOKEN);
        assert_eq!(f.tokens.len(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_fails_distinctly_from_unknown() {
        let f = fixture();
        let created = f
            .service
            .create_verification_token("a@b.com", Some(Duration::minutes(-1)))
            .await
            .unwrap();

        let expired = f
            .service
            .verify_token("a@b.com", &created.token)
            .await
            .unwrap_err();
        let unknown = f
            .service
            .verify_token("a@b.com", "does-not-exist")
            .await
            .unwrap_err();

        assert_eq!(expired.message, "Token has expired");
        assert_eq!(unknown.message, INVALID_TOKEN);
        assert_eq!(expired.kind, unknown.kind);
    }

    #[tokio::test]
    async fn test_verifying_token_leaves_account_unverified() {
        let f = fixture();
        f.service.register(registration("a@b.com")).await.unwrap();
        let created = f
            .service
            .create_verification_token("a@b.com", None)
            .await
            .unwrap();
        f.service
            .verify_token("a@b.com", &created.token)
            .await
            .unwrap();
        assert!(f.users.rows()[0].email_verified.is_none());
    }

    #[tokio::test]
    async fn test_verification_identifier_is_trimmed_on_both_sides() {
        let f = fixture();
        let created = f
            .service
            .create_verification_token(" a@b.com ", None)
            .await
            .unwrap();
        assert_eq!(created.identifier, "a@b.com");

        let consumed = f
            .service
            .verify_token(" a@b.com ", &created.token)
            .await
            .unwrap();
        assert_eq!(consumed.id, created.id);
    }
}
