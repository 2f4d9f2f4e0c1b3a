use axum::http::StatusCode;
use serde_json::{Value, json};

use nomas_api::error::ApiError;
use nomas_api::usecase::usuario::{DeleteUsuarioUseCase, ListUsuariosUseCase, ResetPasswordUseCase};
use nomas_domain::user::Rol;

use crate::helpers::{MockUserRepo, TestApp, caller, fast_hasher, test_user};

// ── Use cases ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_user_listing_for_non_admin() {
    let usecase = ListUsuariosUseCase {
        users: MockUserRepo::new(vec![test_user(1, "ana", Rol::Cliente)]),
    };
    let result = usecase.execute(&caller(1, Rol::Cliente)).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_reject_short_reset_password() {
    let repo = MockUserRepo::new(vec![test_user(2, "ana", Rol::Cliente)]);
    let handle = repo.users_handle();
    let usecase = ResetPasswordUseCase {
        users: repo,
        hasher: fast_hasher(),
    };

    let result = usecase.execute(&caller(1, Rol::Admin), 2, "abc").await;
    match result {
        Err(ApiError::Validation(fields)) => assert!(fields.get("new_password").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(handle.lock().unwrap()[0].password_hash.is_empty());
}

#[tokio::test]
async fn should_store_new_password_hash_on_reset() {
    let repo = MockUserRepo::new(vec![test_user(2, "ana", Rol::Cliente)]);
    let handle = repo.users_handle();
    let usecase = ResetPasswordUseCase {
        users: repo,
        hasher: fast_hasher(),
    };

    usecase
        .execute(&caller(1, Rol::Admin), 2, "nueva123")
        .await
        .unwrap();

    let hash = handle.lock().unwrap()[0].password_hash.clone();
    assert!(fast_hasher().verify("nueva123", &hash).await.unwrap());
}

#[tokio::test]
async fn should_forbid_deleting_own_account() {
    let usecase = DeleteUsuarioUseCase {
        users: MockUserRepo::new(vec![test_user(1, "admin", Rol::Admin)]),
    };
    let result = usecase.execute(&caller(1, Rol::Admin), 1).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_report_missing_user_on_delete() {
    let usecase = DeleteUsuarioUseCase {
        users: MockUserRepo::empty(),
    };
    let result = usecase.execute(&caller(1, Rol::Admin), 9).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_usuario_with_nested_profile() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .post("/api/usuarios/")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "username": "pro1",
            "password": "pass1234",
            "first_name": "Pedro",
            "profile": { "rol": "PROFESIONAL", "telefono": "+56 9 1234 5678" },
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    assert_eq!(created["profile"]["rol"], "PROFESIONAL");
    assert_eq!(created["profile"]["telefono"], "+56 9 1234 5678");
    assert_eq!(created["is_superuser"], false);

    let id = created["id"].as_i64().unwrap();
    let fetched = app
        .server
        .get(&format!("/api/usuarios/{id}/"))
        .add_header(name, value)
        .await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["username"], "pro1");
}

#[tokio::test]
async fn should_accept_flat_profile_fields_on_update() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let user = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .patch(&format!("/api/usuarios/{}/", user.id))
        .add_header(name, value)
        .json(&json!({ "rol": "PROFESIONAL", "direccion": "Av. Siempre Viva 742" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["profile"]["rol"], "PROFESIONAL");
    assert_eq!(body["profile"]["direccion"], "Av. Siempre Viva 742");
    assert_eq!(body["username"], "ana");
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .post("/api/usuarios/")
        .add_header(name, value)
        .json(&json!({ "username": "ana", "password": "pass1234" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["fields"]["username"].is_array());
}

#[tokio::test]
async fn should_forbid_usuarios_for_cliente() {
    let app = TestApp::new().await;
    let user = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(user.id);

    let response = app.server.get("/api/usuarios/").add_header(name, value).await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_answer_404_for_non_numeric_id() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .get("/api/usuarios/abc/")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reset_password_over_http() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let user = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(admin.id);

    let short = app
        .server
        .post(&format!("/api/usuarios/{}/reset-password/", user.id))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "new_password": "abc" }))
        .await;
    short.assert_status(StatusCode::BAD_REQUEST);

    let ok = app
        .server
        .post(&format!("/api/usuarios/{}/reset-password/", user.id))
        .add_header(name, value)
        .json(&json!({ "new_password": "nueva123" }))
        .await;
    ok.assert_status_ok();

    let login = app
        .server
        .post("/api/token/")
        .json(&json!({ "username": "ana", "password": "nueva123" }))
        .await;
    login.assert_status_ok();
}

#[tokio::test]
async fn should_delete_usuario() {
    let app = TestApp::new().await;
    let admin = app.seed_user("admin", "admin", Rol::Admin).await;
    let user = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(admin.id);

    let response = app
        .server
        .delete(&format!("/api/usuarios/{}/", user.id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let gone = app
        .server
        .get(&format!("/api/usuarios/{}/", user.id))
        .add_header(name, value)
        .await;
    gone.assert_status(StatusCode::NOT_FOUND);
}
