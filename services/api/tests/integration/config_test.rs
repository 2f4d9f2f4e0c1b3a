use axum::http::StatusCode;
use serde_json::{Value, json};

use nomas_domain::user::Rol;

use crate::helpers::TestApp;

#[tokio::test]
async fn should_create_default_config_on_first_read() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/config/").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["id"], 1);
    assert_eq!(body["nombre_sistema"], "No Más Accidentes");
    assert_eq!(body["permitir_registro_publico_clientes"], true);
    assert_eq!(body["dias_min_anticipacion_cancelacion"], 0);

    let again = app.server.get("/api/config/").await;
    assert_eq!(again.json::<Value>()["id"], 1);
}

#[tokio::test]
async fn should_update_config_as_admin() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .patch("/api/config/")
        .add_header(name, value)
        .json(&json!({ "razon_social": "NMA Ltda.", "dias_min_anticipacion_cancelacion": 3 }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["razon_social"], "NMA Ltda.");
    assert_eq!(body["dias_min_anticipacion_cancelacion"], 3);
    assert_eq!(body["nombre_sistema"], "No Más Accidentes");
}

#[tokio::test]
async fn should_reject_negative_cancellation_days() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .put("/api/config/")
        .add_header(name, value)
        .json(&json!({ "dias_min_anticipacion_cancelacion": -1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_forbid_config_update_for_cliente() {
    let app = TestApp::new().await;
    let ana = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(ana.id);

    let response = app
        .server
        .patch("/api/config/")
        .add_header(name, value)
        .json(&json!({ "razon_social": "X" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_close_public_registration() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let (name, value) = app.auth(admin.id);

    app.server
        .patch("/api/config/")
        .add_header(name, value)
        .json(&json!({ "permitir_registro_publico_clientes": false }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/auth/registro-cliente/")
        .json(&json!({ "username": "nuevo", "password": "pass1234" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}
