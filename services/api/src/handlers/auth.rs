use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use nomas_domain::user::Rol;

use crate::domain::types::Caller;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::handlers::usuario::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{RegisterClienteInput, RegisterClienteUseCase};

// ── GET /api/auth/me/ ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Role used for authorization; superusers without a profile report ADMIN.
    pub rol: Option<Rol>,
}

pub async fn get_me(caller: Caller) -> Json<MeResponse> {
    let rol = caller.rol();
    Json(MeResponse {
        user: caller.user.into(),
        rol,
    })
}

// ── POST /api/auth/registro-cliente/ ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterClienteRequest {
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
    pub empresa_nombre: Option<String>,
    pub empresa_rut: Option<String>,
}

pub async fn register_cliente(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterClienteRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = RegisterClienteUseCase {
        users: state.user_repo(),
        clientes: state.cliente_repo(),
        config: state.config_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(RegisterClienteInput {
            username: body.username,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            empresa_nombre: body.empresa_nombre,
            empresa_rut: body.empresa_rut,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}
