//! Authentication API endpoints

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedAdmin};
use crate::models::AdminClaims;
use crate::services::LoginResponse;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(
        state.auth_service.login(&body.username, &body.password).await?,
    ))
}

/// GET /api/auth/me
pub async fn me(
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> Result<Json<AdminClaims>, ApiError> {
    Ok(Json(admin.0))
}
