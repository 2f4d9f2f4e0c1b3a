use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldErrors};
use crate::extract::JsonBody;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase, RefreshUseCase};

// ── POST /api/token/ ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let mut errors = FieldErrors::new();
    if body.username.is_empty() {
        errors.add("username", "this field may not be blank");
    }
    if body.password.is_empty() {
        errors.add("password", "this field may not be blank");
    }
    errors.into_result()?;

    let usecase = LoginUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
        jwt: state.jwt.clone(),
    };
    let pair = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(Json(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

// ── POST /api/token/refresh/ ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub access: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> Result<Json<AccessResponse>, ApiError> {
    if body.refresh.is_empty() {
        return Err(ApiError::field("refresh", "this field may not be blank"));
    }
    let usecase = RefreshUseCase {
        users: state.user_repo(),
        jwt: state.jwt.clone(),
    };
    let access = usecase.execute(&body.refresh).await?;
    Ok(Json(AccessResponse { access }))
}
