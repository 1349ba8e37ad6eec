//! Auth handlers: register, login, me, logout, and verification tokens.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Duration;

use medidir_core::error::AppError;
use medidir_entity::{User, VerificationToken};

use crate::dto::request::{LoginRequest, RegisterRequest, VerificationTokenRequest};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.auth_service.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let login = req
        .login()
        .ok_or_else(|| AppError::validation("Either email or phone_number is required"))?;

    let result = state.auth_service.login(login, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        user: result.user,
        token: result.token,
        expires_at: result.expires_at,
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.auth_service.current_user(auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.auth_service.logout(&auth.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/verification-tokens
pub async fn create_verification_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerificationTokenRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VerificationToken>>), AppError> {
    let token = state
        .auth_service
        .create_verification_token(&req.identifier, req.ttl_minutes.map(Duration::minutes))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(token))))
}

/// DELETE /api/auth/verification-tokens/{identifier}/{token}
pub async fn use_verification_token(
    State(state): State<AppState>,
    Path((identifier, token)): Path<(String, String)>,
) -> Result<Json<ApiResponse<VerificationToken>>, AppError> {
    let consumed = state.auth_service.verify_token(&identifier, &token).await?;
    Ok(Json(ApiResponse::ok(consumed)))
}
