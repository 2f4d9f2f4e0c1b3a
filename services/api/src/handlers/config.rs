use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Caller, ConfigChanges, SystemConfig};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;
use crate::usecase::config::{GetConfigUseCase, UpdateConfigUseCase};

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub id: i32,
    pub nombre_sistema: String,
    pub razon_social: String,
    pub rut_empresa: String,
    pub direccion: String,
    pub telefono_contacto: String,
    pub email_contacto: String,
    pub sitio_web: String,
    pub dias_min_anticipacion_cancelacion: i32,
    pub permitir_registro_publico_clientes: bool,
    pub texto_portada: String,
    #[serde(serialize_with = "nomas_core::serde::to_rfc3339_ms")]
    pub actualizado_en: DateTime<Utc>,
}

impl From<SystemConfig> for ConfigResponse {
    fn from(config: SystemConfig) -> Self {
        Self {
            id: nomas_api_schema::system_config::SINGLETON_ID,
            nombre_sistema: config.nombre_sistema,
            razon_social: config.razon_social,
            rut_empresa: config.rut_empresa,
            direccion: config.direccion,
            telefono_contacto: config.telefono_contacto,
            email_contacto: config.email_contacto,
            sitio_web: config.sitio_web,
            dias_min_anticipacion_cancelacion: config.dias_min_anticipacion_cancelacion,
            permitir_registro_publico_clientes: config.permitir_registro_publico_clientes,
            texto_portada: config.texto_portada,
            actualizado_en: config.actualizado_en,
        }
    }
}

// ── GET /api/config/ ─────────────────────────────────────────────────────────

pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, ApiError> {
    let usecase = GetConfigUseCase {
        config: state.config_repo(),
    };
    Ok(Json(usecase.execute().await?.into()))
}

// ── PUT|PATCH /api/config/ ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    pub nombre_sistema: Option<String>,
    pub razon_social: Option<String>,
    pub rut_empresa: Option<String>,
    pub direccion: Option<String>,
    pub telefono_contacto: Option<String>,
    pub email_contacto: Option<String>,
    pub sitio_web: Option<String>,
    pub dias_min_anticipacion_cancelacion: Option<i32>,
    pub permitir_registro_publico_clientes: Option<bool>,
    pub texto_portada: Option<String>,
}

pub async fn update_config(
    caller: Caller,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateConfigRequest>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let usecase = UpdateConfigUseCase {
        config: state.config_repo(),
    };
    let updated = usecase
        .execute(
            &caller,
            ConfigChanges {
                nombre_sistema: body.nombre_sistema,
                razon_social: body.razon_social,
                rut_empresa: body.rut_empresa,
                direccion: body.direccion,
                telefono_contacto: body.telefono_contacto,
                email_contacto: body.email_contacto,
                sitio_web: body.sitio_web,
                dias_min_anticipacion_cancelacion: body.dias_min_anticipacion_cancelacion,
                permitir_registro_publico_clientes: body.permitir_registro_publico_clientes,
                texto_portada: body.texto_portada,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}
