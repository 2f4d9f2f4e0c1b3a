use axum::http::StatusCode;
use serde_json::{Value, json};

use nomas_api::domain::repository::ProfesionalRepository;
use nomas_api::domain::types::NewProfesional;
use nomas_domain::user::Rol;

use crate::helpers::TestApp;

async fn create_profesional(app: &TestApp, admin_id: i32, username: &str) -> Value {
    let (name, value) = app.auth(admin_id);
    let response = app
        .server
        .post("/api/profesionales/")
        .add_header(name, value)
        .json(&json!({
            "username": username,
            "password": "pass1234",
            "first_name": "Pedro",
            "last_name": "Soto",
            "especialidad": "Prevención de riesgos",
            "rut": "12.345.678-9",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn should_create_profesional_with_user() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;

    let created = create_profesional(&app, admin.id, "pedro").await;
    assert_eq!(created["disponible"], true);
    assert_eq!(created["especialidad"], "Prevención de riesgos");
    assert_eq!(created["user"]["username"], "pedro");
    assert_eq!(created["user"]["profile"]["rol"], "PROFESIONAL");
    assert_eq!(created["user"]["profile"]["rut"], "12.345.678-9");

    let login = app
        .server
        .post("/api/token/")
        .json(&json!({ "username": "pedro", "password": "pass1234" }))
        .await;
    login.assert_status_ok();
}

#[tokio::test]
async fn should_delete_profesional_together_with_user() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let created = create_profesional(&app, admin.id, "pedro").await;
    let id = created["id"].as_i64().unwrap();
    let user_id = created["user"]["id"].as_i64().unwrap();
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .delete(&format!("/api/profesionales/{id}/"))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let user = app
        .server
        .get(&format!("/api/usuarios/{user_id}/"))
        .add_header(name.clone(), value.clone())
        .await;
    user.assert_status(StatusCode::NOT_FOUND);

    let again = app
        .server
        .delete(&format!("/api/profesionales/{id}/"))
        .add_header(name, value)
        .await;
    again.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_update_profesional_flat_fields() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let created = create_profesional(&app, admin.id, "pedro").await;
    let id = created["id"].as_i64().unwrap();
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .patch(&format!("/api/profesionales/{id}/"))
        .add_header(name, value)
        .json(&json!({ "disponible": false, "telefono": "+56 2 2222 2222", "first_name": "Pablo" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["disponible"], false);
    assert_eq!(body["user"]["first_name"], "Pablo");
    assert_eq!(body["user"]["profile"]["telefono"], "+56 2 2222 2222");
}

#[tokio::test]
async fn should_forbid_profesionales_for_cliente() {
    let app = TestApp::new().await;
    let ana = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(ana.id);

    let response = app
        .server
        .get("/api/profesionales/")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_create_own_record_on_first_access() {
    let app = TestApp::new().await;
    let pro = app.seed_user("pro", "pass1234", Rol::Profesional).await;
    let (name, value) = app.auth(pro.id);

    let first = app
        .server
        .get("/api/profesionales/me/")
        .add_header(name.clone(), value.clone())
        .await;
    first.assert_status_ok();
    let first = first.json::<Value>();
    assert_eq!(first["user_id"], pro.id);
    assert_eq!(first["username"], "pro");
    assert_eq!(first["disponible"], true);

    let second = app
        .server
        .get("/api/profesionales/me/")
        .add_header(name, value)
        .await;
    assert_eq!(second.json::<Value>()["id"], first["id"]);
}

#[tokio::test]
async fn should_return_existing_record_when_insert_conflicts() {
    let app = TestApp::new().await;
    let pro = app.seed_user("pro", "pass1234", Rol::Profesional).await;
    let repo = app.state.profesional_repo();

    let first = repo
        .get_or_create_for_user(pro.id, &NewProfesional::default())
        .await
        .unwrap();
    let again = repo
        .get_or_create_for_user(pro.id, &NewProfesional::default())
        .await
        .unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(again.user.id, pro.id);
}

#[tokio::test]
async fn should_serve_same_record_to_simultaneous_first_requests() {
    let app = TestApp::new().await;
    let pro = app.seed_user("pro", "pass1234", Rol::Profesional).await;
    let (name, value) = app.auth(pro.id);

    let (a, b) = tokio::join!(
        async {
            app.server
                .get("/api/profesionales/me/")
                .add_header(name.clone(), value.clone())
                .await
        },
        async {
            app.server
                .get("/api/profesionales/me/")
                .add_header(name.clone(), value.clone())
                .await
        },
    );
    a.assert_status_ok();
    b.assert_status_ok();
    assert_eq!(a.json::<Value>()["id"], b.json::<Value>()["id"]);
}

#[tokio::test]
async fn should_update_own_record_but_not_activation() {
    let app = TestApp::new().await;
    let pro = app.seed_user("pro", "pass1234", Rol::Profesional).await;
    let (name, value) = app.auth(pro.id);

    let response = app
        .server
        .patch("/api/profesionales/me/")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "especialidad": "Altura física",
            "direccion": "Calle 1",
            "is_active": false,
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["especialidad"], "Altura física");
    assert_eq!(body["direccion"], "Calle 1");

    let me = app.server.get("/api/auth/me/").add_header(name, value).await;
    me.assert_status_ok();
    assert_eq!(me.json::<Value>()["is_active"], true);
}

#[tokio::test]
async fn should_forbid_own_record_for_non_profesional() {
    let app = TestApp::new().await;
    let ana = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(ana.id);

    let response = app
        .server
        .get("/api/profesionales/me/")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reset_profesional_password() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let created = create_profesional(&app, admin.id, "pedro").await;
    let id = created["id"].as_i64().unwrap();
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .post(&format!("/api/profesionales/{id}/reset-password/"))
        .add_header(name, value)
        .json(&json!({ "new_password": "otra1234" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["detail"], "password updated");

    let login = app
        .server
        .post("/api/token/")
        .json(&json!({ "username": "pedro", "password": "otra1234" }))
        .await;
    login.assert_status_ok();
}
