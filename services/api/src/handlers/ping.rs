use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

// ── GET /api/ping/ ───────────────────────────────────────────────────────────

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "API NoMasAccidentes funcionando ✅",
    })
}
