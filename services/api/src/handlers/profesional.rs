use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Caller, Profesional};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::handlers::usuario::{DetailResponse, ResetPasswordRequest, UserResponse};
use crate::state::AppState;
use crate::usecase::profesional::{
    CreateProfesionalInput, CreateProfesionalUseCase, DeleteProfesionalUseCase,
    GetMyProfesionalUseCase, GetProfesionalUseCase, ListProfesionalesUseCase,
    ResetProfesionalPasswordUseCase, UpdateMyProfesionalUseCase, UpdateProfesionalInput,
    UpdateProfesionalUseCase,
};

#[derive(Debug, Serialize)]
pub struct ProfesionalResponse {
    pub id: i32,
    pub user: UserResponse,
    pub especialidad: String,
    pub registro_profesional: String,
    pub disponible: bool,
}

impl From<Profesional> for ProfesionalResponse {
    fn from(profesional: Profesional) -> Self {
        Self {
            id: profesional.id,
            user: profesional.user.into(),
            especialidad: profesional.especialidad,
            registro_profesional: profesional.registro_profesional,
            disponible: profesional.disponible,
        }
    }
}

/// Flat self-service view: user, profile and profesional fields side by side.
#[derive(Debug, Serialize)]
pub struct MyProfesionalResponse {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rut: String,
    pub telefono: String,
    pub direccion: String,
    pub especialidad: String,
    pub registro_profesional: String,
    pub disponible: bool,
}

impl From<Profesional> for MyProfesionalResponse {
    fn from(profesional: Profesional) -> Self {
        let user = profesional.user;
        let profile = user.profile.unwrap_or_default();
        Self {
            id: profesional.id,
            user_id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            rut: profile.rut,
            telefono: profile.telefono,
            direccion: profile.direccion,
            especialidad: profesional.especialidad,
            registro_profesional: profesional.registro_profesional,
            disponible: profesional.disponible,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfesionalRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub rut: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub especialidad: Option<String>,
    pub registro_profesional: Option<String>,
    pub disponible: Option<bool>,
}

impl From<UpdateProfesionalRequest> for UpdateProfesionalInput {
    fn from(body: UpdateProfesionalRequest) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            is_active: body.is_active,
            rut: body.rut,
            telefono: body.telefono,
            direccion: body.direccion,
            especialidad: body.especialidad,
            registro_profesional: body.registro_profesional,
            disponible: body.disponible,
        }
    }
}

// ── GET /api/profesionales/ ──────────────────────────────────────────────────

pub async fn list_profesionales(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfesionalResponse>>, ApiError> {
    let usecase = ListProfesionalesUseCase {
        profesionales: state.profesional_repo(),
    };
    let profesionales = usecase.execute(&caller).await?;
    Ok(Json(
        profesionales
            .into_iter()
            .map(ProfesionalResponse::from)
            .collect(),
    ))
}

// ── POST /api/profesionales/ ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateProfesionalRequest {
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
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub especialidad: String,
    #[serde(default)]
    pub registro_profesional: String,
    pub disponible: Option<bool>,
}

pub async fn create_profesional(
    caller: Caller,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProfesionalRequest>,
) -> Result<(StatusCode, Json<ProfesionalResponse>), ApiError> {
    let usecase = CreateProfesionalUseCase {
        profesionales: state.profesional_repo(),
        users: state.user_repo(),
        hasher: state.hasher,
    };
    let profesional = usecase
        .execute(
            &caller,
            CreateProfesionalInput {
                username: body.username,
                password: body.password,
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                rut: body.rut,
                telefono: body.telefono,
                direccion: body.direccion,
                especialidad: body.especialidad,
                registro_profesional: body.registro_profesional,
                disponible: body.disponible.unwrap_or(true),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(profesional.into())))
}

// ── GET /api/profesionales/{id}/ ─────────────────────────────────────────────

pub async fn get_profesional(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ProfesionalResponse>, ApiError> {
    let usecase = GetProfesionalUseCase {
        profesionales: state.profesional_repo(),
    };
    Ok(Json(usecase.execute(&caller, id).await?.into()))
}

// ── PUT|PATCH /api/profesionales/{id}/ ───────────────────────────────────────

pub async fn update_profesional(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateProfesionalRequest>,
) -> Result<Json<ProfesionalResponse>, ApiError> {
    let usecase = UpdateProfesionalUseCase {
        profesionales: state.profesional_repo(),
    };
    let profesional = usecase.execute(&caller, id, body.into()).await?;
    Ok(Json(profesional.into()))
}

// ── DELETE /api/profesionales/{id}/ ──────────────────────────────────────────

pub async fn delete_profesional(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteProfesionalUseCase {
        profesionales: state.profesional_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/profesionales/{id}/reset-password/ ─────────────────────────────

pub async fn reset_profesional_password(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<Json<DetailResponse>, ApiError> {
    let usecase = ResetProfesionalPasswordUseCase {
        profesionales: state.profesional_repo(),
        users: state.user_repo(),
        hasher: state.hasher,
    };
    usecase.execute(&caller, id, &body.new_password).await?;
    Ok(Json(DetailResponse {
        detail: "password updated",
    }))
}

// ── GET /api/profesionales/me/ ───────────────────────────────────────────────

pub async fn get_my_profesional(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<MyProfesionalResponse>, ApiError> {
    let usecase = GetMyProfesionalUseCase {
        profesionales: state.profesional_repo(),
    };
    Ok(Json(usecase.execute(&caller).await?.into()))
}

// ── PATCH /api/profesionales/me/ ─────────────────────────────────────────────

pub async fn update_my_profesional(
    caller: Caller,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateProfesionalRequest>,
) -> Result<Json<MyProfesionalResponse>, ApiError> {
    let usecase = UpdateMyProfesionalUseCase {
        profesionales: state.profesional_repo(),
    };
    Ok(Json(usecase.execute(&caller, body.into()).await?.into()))
}
