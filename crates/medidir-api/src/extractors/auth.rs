//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and resolves it to a user with a live session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use medidir_core::error::AppError;
use medidir_entity::User;

use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// The raw bearer token, needed to end the session on logout.
    pub token: String,
}

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::authentication("Missing or invalid Authorization header"))?;

        let token = bearer.token().to_string();
        let user = state.auth_service.authenticate(&token).await?;

        Ok(Self { user, token })
    }
}
