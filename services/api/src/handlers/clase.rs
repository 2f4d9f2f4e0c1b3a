use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use nomas_core::serde::double_option;
use nomas_domain::clase::EstadoClase;

use crate::domain::types::{Caller, ClaseChanges, ClaseView};
use crate::error::{ApiError, FieldErrors};
use crate::extract::{JsonBody, PathId, QueryParams};
use crate::state::AppState;
use crate::usecase::clase::{
    CreateClaseInput, CreateClaseUseCase, DeleteClaseUseCase, GetClaseUseCase, ListClasesQuery,
    ListClasesUseCase, UpdateClaseUseCase,
};

#[derive(Debug, Serialize)]
pub struct ClaseResponse {
    pub id: i32,
    pub titulo: String,
    pub descripcion: String,
    pub fecha_solicitada: Option<NaiveDate>,
    pub modalidad: String,
    pub estado: EstadoClase,
    pub cliente: i32,
    pub cliente_nombre: String,
    pub solicitada_por: Option<i32>,
    pub solicitante_nombre: Option<String>,
    pub profesional_asignado: Option<i32>,
    pub profesional_nombre: Option<String>,
    #[serde(serialize_with = "nomas_core::serde::to_rfc3339_ms")]
    pub creado_en: DateTime<Utc>,
    #[serde(serialize_with = "nomas_core::serde::to_rfc3339_ms")]
    pub actualizado_en: DateTime<Utc>,
}

impl From<ClaseView> for ClaseResponse {
    fn from(view: ClaseView) -> Self {
        let clase = view.clase;
        Self {
            id: clase.id,
            titulo: clase.titulo,
            descripcion: clase.descripcion,
            fecha_solicitada: clase.fecha_solicitada,
            modalidad: clase.modalidad,
            estado: clase.estado,
            cliente: clase.cliente_id,
            cliente_nombre: view.cliente_nombre,
            solicitada_por: clase.solicitada_por_id,
            solicitante_nombre: view.solicitante_nombre,
            profesional_asignado: clase.profesional_asignado_id,
            profesional_nombre: view.profesional_nombre,
            creado_en: clase.creado_en,
            actualizado_en: clase.actualizado_en,
        }
    }
}

// ── GET /api/clases/ ─────────────────────────────────────────────────────────

/// Raw query parameters; blank values are treated as absent.
#[derive(Debug, Deserialize)]
pub struct ListClasesParams {
    pub cliente_id: Option<String>,
    pub profesional_id: Option<String>,
    pub estado: Option<String>,
}

impl ListClasesParams {
    fn parse(self) -> Result<ListClasesQuery, ApiError> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        }

        let mut errors = FieldErrors::new();
        let mut parse_id = |field: &str, value: Option<String>| match non_blank(value) {
            Some(raw) => match raw.parse::<i32>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add(field, "a valid integer is required");
                    None
                }
            },
            None => None,
        };
        let cliente_id = parse_id("cliente_id", self.cliente_id);
        let profesional_id = parse_id("profesional_id", self.profesional_id);
        let estado = match non_blank(self.estado) {
            Some(raw) => match raw.to_ascii_uppercase().parse::<EstadoClase>() {
                Ok(estado) => Some(estado),
                Err(_) => {
                    errors.add("estado", format!("\"{raw}\" is not a valid choice"));
                    None
                }
            },
            None => None,
        };
        errors.into_result()?;
        Ok(ListClasesQuery {
            cliente_id,
            profesional_id,
            estado,
        })
    }
}

pub async fn list_clases(
    caller: Caller,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListClasesParams>,
) -> Result<Json<Vec<ClaseResponse>>, ApiError> {
    let query = params.parse()?;
    let usecase = ListClasesUseCase {
        clases: state.clase_repo(),
        clientes: state.cliente_repo(),
        profesionales: state.profesional_repo(),
    };
    let clases = usecase.execute(&caller, query).await?;
    Ok(Json(clases.into_iter().map(ClaseResponse::from).collect()))
}

// ── POST /api/clases/ ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateClaseRequest {
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    pub fecha_solicitada: Option<NaiveDate>,
    #[serde(default)]
    pub modalidad: String,
    pub estado: Option<EstadoClase>,
    pub cliente: Option<i32>,
    pub solicitada_por: Option<i32>,
    pub profesional_asignado: Option<i32>,
}

pub async fn create_clase(
    caller: Caller,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateClaseRequest>,
) -> Result<(StatusCode, Json<ClaseResponse>), ApiError> {
    let usecase = CreateClaseUseCase {
        clases: state.clase_repo(),
        clientes: state.cliente_repo(),
        profesionales: state.profesional_repo(),
        users: state.user_repo(),
    };
    let clase = usecase
        .execute(
            &caller,
            CreateClaseInput {
                titulo: body.titulo,
                descripcion: body.descripcion,
                fecha_solicitada: body.fecha_solicitada,
                modalidad: body.modalidad,
                estado: body.estado,
                cliente_id: body.cliente,
                solicitada_por_id: body.solicitada_por,
                profesional_asignado_id: body.profesional_asignado,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(clase.into())))
}

// ── GET /api/clases/{id}/ ────────────────────────────────────────────────────

pub async fn get_clase(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ClaseResponse>, ApiError> {
    let usecase = GetClaseUseCase {
        clases: state.clase_repo(),
        clientes: state.cliente_repo(),
        profesionales: state.profesional_repo(),
    };
    Ok(Json(usecase.execute(&caller, id).await?.into()))
}

// ── PUT|PATCH /api/clases/{id}/ ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateClaseRequest {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub fecha_solicitada: Option<Option<NaiveDate>>,
    pub modalidad: Option<String>,
    pub estado: Option<EstadoClase>,
    pub cliente: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub solicitada_por: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profesional_asignado: Option<Option<i32>>,
}

pub async fn update_clase(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateClaseRequest>,
) -> Result<Json<ClaseResponse>, ApiError> {
    let usecase = UpdateClaseUseCase {
        clases: state.clase_repo(),
        clientes: state.cliente_repo(),
        profesionales: state.profesional_repo(),
        users: state.user_repo(),
    };
    let clase = usecase
        .execute(
            &caller,
            id,
            ClaseChanges {
                titulo: body.titulo,
                descripcion: body.descripcion,
                fecha_solicitada: body.fecha_solicitada,
                modalidad: body.modalidad,
                estado: body.estado,
                cliente_id: body.cliente,
                solicitada_por_id: body.solicitada_por,
                profesional_asignado_id: body.profesional_asignado,
            },
        )
        .await?;
    Ok(Json(clase.into()))
}

// ── DELETE /api/clases/{id}/ ─────────────────────────────────────────────────

pub async fn delete_clase(
    caller: Caller,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteClaseUseCase {
        clases: state.clase_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
