use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nomas_core::serde::double_option;

use crate::domain::types::{Caller, Cliente, ClienteChanges};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId, QueryParams};
use crate::handlers::parse_query_bool;
use crate::state::AppState;
use crate::usecase::cliente::{
    CreateClienteInput, CreateClienteUseCase, DeactivateClienteUseCase, GetClienteUseCase,
    ListClientesUseCase, UpdateClienteUseCase,
};

#[derive(Debug, Serialize)]
pub struct ClienteResponse {
    pub id: i32,
    pub nombre: String,
    pub rut: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub usuario: Option<i32>,
    pub activo: bool,
    #[serde(serialize_with = "nomas_core::serde::to_rfc3339_ms")]
    pub creado_en: DateTime<Utc>,
    #[serde(serialize_with = "nomas_core::serde::to_rfc3339_ms")]
    pub actualizado_en: DateTime<Utc>,
}

impl From<Cliente> for ClienteResponse {
    fn from(cliente: Cliente) -> Self {
        Self {
            id: cliente.id,
            nombre: cliente.nombre,
            rut: cliente.rut,
            direccion: cliente.direccion,
            telefono: cliente.telefono,
            email: cliente.email,
            usuario: cliente.usuario_id,
            activo: cliente.activo,
            creado_en: cliente.creado_en,
            actualizado_en: cliente.actualizado_en,
        }
    }
}

// ── GET /api/clientes/ ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListClientesQuery {
    pub activo: Option<String>,
}

pub async fn list_clientes(
    caller: Caller,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListClientesQuery>,
) -> Result<Json<Vec<ClienteResponse>>, ApiError> {
    let activo = match query.activo.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            parse_query_bool(raw).ok_or_else(|| ApiError::field("activo", "must be a boolean"))?,
        ),
    };
    let usecase = ListClientesUseCase {
        clientes: state.cliente_repo(),
    };
    let clientes = usecase.execute(&caller, activo).await?;
    Ok(Json(clientes.into_iter().map(ClienteResponse::from).collect()))
}

// ── POST /api/clientes/ ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateClienteRequest {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub rut: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub email: String,
    pub usuario: Option<i32>,
    pub activo: Option<bool>,
}

pub async fn create_cliente(
    caller: Caller,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateClienteRequest>,
) -> Result<(StatusCode, Json<ClienteResponse>), ApiError> {
    let usecase = CreateClienteUseCase {
        clientes: state.cliente_repo(),
        users: state.user_repo(),
    };
    let cliente = usecase
        .execute(
            &caller,
            CreateClienteInput {
                nombre: body.nombre,
                rut: body.rut,
                direccion: body.direccion,
                telefono: body.telefono,
                email: body.email,
                usuario_id: body.usuario,
                activo: body.activo.unwrap_or(true),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(cliente.into())))
}

// ── GET /api/clientes/{id}/ ──────────────────────────────────────────────────

pub async fn get_cliente(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ClienteResponse>, ApiError> {
    let usecase = GetClienteUseCase {
        clientes: state.cliente_repo(),
    };
    Ok(Json(usecase.execute(&caller, id).await?.into()))
}

// ── PUT|PATCH /api/clientes/{id}/ ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateClienteRequest {
    pub nombre: Option<String>,
    pub rut: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub usuario: Option<Option<i32>>,
    pub activo: Option<bool>,
}

pub async fn update_cliente(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateClienteRequest>,
) -> Result<Json<ClienteResponse>, ApiError> {
    let usecase = UpdateClienteUseCase {
        clientes: state.cliente_repo(),
        users: state.user_repo(),
    };
    let cliente = usecase
        .execute(
            &caller,
            id,
            ClienteChanges {
                nombre: body.nombre,
                rut: body.rut,
                direccion: body.direccion,
                telefono: body.telefono,
                email: body.email,
                usuario_id: body.usuario,
                activo: body.activo,
            },
        )
        .await?;
    Ok(Json(cliente.into()))
}

// ── DELETE /api/clientes/{id}/ ───────────────────────────────────────────────

pub async fn delete_cliente(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    let usecase = DeactivateClienteUseCase {
        clientes: state.cliente_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
