use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nomas_domain::user::Rol;

use crate::domain::types::{Caller, Profile, User};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::state::AppState;
use crate::usecase::usuario::{
    CreateUsuarioInput, CreateUsuarioUseCase, DeleteUsuarioUseCase, GetUsuarioUseCase,
    ListUsuariosUseCase, ProfileInput, ResetPasswordUseCase, UpdateUsuarioInput,
    UpdateUsuarioUseCase,
};

// ── Representation ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub rut: String,
    pub telefono: String,
    pub direccion: String,
    pub rol: Rol,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            rut: profile.rut,
            telefono: profile.telefono,
            direccion: profile.direccion,
            rol: profile.rol,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    #[serde(serialize_with = "nomas_core::serde::to_rfc3339_ms")]
    pub date_joined: DateTime<Utc>,
    #[serde(serialize_with = "nomas_core::serde::opt_to_rfc3339_ms")]
    pub last_login: Option<DateTime<Utc>>,
    pub profile: Option<ProfileResponse>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
            last_login: user.last_login,
            profile: user.profile.map(ProfileResponse::from),
        }
    }
}

/// Profile fields, accepted both flat on the body and nested under `profile`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub rut: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub rol: Option<Rol>,
}

/// Flat keys win over the nested `profile` object.
fn merge_profile(flat: ProfileRequest, nested: Option<ProfileRequest>) -> ProfileInput {
    let nested = nested.unwrap_or_default();
    ProfileInput {
        rut: flat.rut.or(nested.rut),
        telefono: flat.telefono.or(nested.telefono),
        direccion: flat.direccion.or(nested.direccion),
        rol: flat.rol.or(nested.rol),
    }
}

fn default_true() -> bool {
    true
}

// ── GET /api/usuarios/ ───────────────────────────────────────────────────────

pub async fn list_usuarios(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsuariosUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(&caller).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /api/usuarios/ ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUsuarioRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(flatten)]
    pub flat_profile: ProfileRequest,
    pub profile: Option<ProfileRequest>,
}

pub async fn create_usuario(
    caller: Caller,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUsuarioRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = CreateUsuarioUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(
            &caller,
            CreateUsuarioInput {
                username: body.username,
                password: body.password,
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                is_active: body.is_active,
                profile: merge_profile(body.flat_profile, body.profile),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /api/usuarios/{id}/ ──────────────────────────────────────────────────

pub async fn get_usuario(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUsuarioUseCase {
        users: state.user_repo(),
    };
    Ok(Json(usecase.execute(&caller, id).await?.into()))
}

// ── PUT|PATCH /api/usuarios/{id}/ ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateUsuarioRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub flat_profile: ProfileRequest,
    pub profile: Option<ProfileRequest>,
}

pub async fn update_usuario(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateUsuarioRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = UpdateUsuarioUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(
            &caller,
            id,
            UpdateUsuarioInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                is_active: body.is_active,
                password: body.password,
                profile: merge_profile(body.flat_profile, body.profile),
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /api/usuarios/{id}/ ───────────────────────────────────────────────

pub async fn delete_usuario(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteUsuarioUseCase {
        users: state.user_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/usuarios/{id}/reset-password/ ──────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

pub async fn reset_password(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    usecase.execute(&caller, id, &body.new_password).await?;
    Ok(Json(DetailResponse {
        detail: "password updated",
    }))
}
