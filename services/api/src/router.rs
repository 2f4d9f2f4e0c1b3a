use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use nomas_core::health::healthz;
use nomas_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{get_me, register_cliente},
    clase::{create_clase, delete_clase, get_clase, list_clases, update_clase},
    cliente::{create_cliente, delete_cliente, get_cliente, list_clientes, update_cliente},
    config::{get_config, update_config},
    health::readyz,
    ping::ping,
    profesional::{
        create_profesional, delete_profesional, get_my_profesional, get_profesional,
        list_profesionales, reset_profesional_password, update_my_profesional,
        update_profesional,
    },
    token::{create_token, refresh_token},
    usuario::{
        create_usuario, delete_usuario, get_usuario, list_usuarios, reset_password,
        update_usuario,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/ping/", get(ping))
        // Token
        .route("/api/token/", post(create_token))
        .route("/api/token/refresh/", post(refresh_token))
        // Auth
        .route("/api/auth/me/", get(get_me))
        .route("/api/auth/registro-cliente/", post(register_cliente))
        // Config
        .route(
            "/api/config/",
            get(get_config).put(update_config).patch(update_config),
        )
        // Usuarios
        .route("/api/usuarios/", get(list_usuarios).post(create_usuario))
        .route(
            "/api/usuarios/{id}/",
            get(get_usuario)
                .put(update_usuario)
                .patch(update_usuario)
                .delete(delete_usuario),
        )
        .route("/api/usuarios/{id}/reset-password/", post(reset_password))
        // Clientes
        .route("/api/clientes/", get(list_clientes).post(create_cliente))
        .route(
            "/api/clientes/{id}/",
            get(get_cliente)
                .put(update_cliente)
                .patch(update_cliente)
                .delete(delete_cliente),
        )
        // Profesionales
        .route(
            "/api/profesionales/",
            get(list_profesionales).post(create_profesional),
        )
        .route(
            "/api/profesionales/me/",
            get(get_my_profesional)
                .put(update_my_profesional)
                .patch(update_my_profesional),
        )
        .route(
            "/api/profesionales/{id}/",
            get(get_profesional)
                .put(update_profesional)
                .patch(update_profesional)
                .delete(delete_profesional),
        )
        .route(
            "/api/profesionales/{id}/reset-password/",
            post(reset_profesional_password),
        )
        // Clases
        .route("/api/clases/", get(list_clases).post(create_clase))
        .route(
            "/api/clases/{id}/",
            get(get_clase)
                .put(update_clase)
                .patch(update_clase)
                .delete(delete_clase),
        )
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
