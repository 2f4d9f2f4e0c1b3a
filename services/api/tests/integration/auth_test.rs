use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use serde_json::{Value, json};

use nomas_api::domain::repository::UserRepository;
use nomas_api::domain::types::UserChanges;
use nomas_api::error::ApiError;
use nomas_api::usecase::auth::{
    LoginInput, LoginUseCase, RefreshUseCase, RegisterClienteInput, RegisterClienteUseCase,
};
use nomas_domain::user::Rol;
use nomas_testing::auth::{access_token, refresh_token};

use crate::helpers::{
    MockClienteRepo, MockConfigRepo, MockUserRepo, TEST_JWT_SECRET, TestApp, default_config,
    fast_hasher, jwt, test_cliente, test_user,
};

fn register_input(username: &str) -> RegisterClienteInput {
    RegisterClienteInput {
        username: username.to_owned(),
        password: "pass1234".to_owned(),
        first_name: "Ana".to_owned(),
        last_name: "Rojas".to_owned(),
        email: "ana@example.com".to_owned(),
        empresa_nombre: None,
        empresa_rut: None,
    }
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_and_record_last_login() {
    let mut user = test_user(1, "ana", Rol::Cliente);
    user.password_hash = fast_hasher().hash("pass1234").await.unwrap();
    let repo = MockUserRepo::new(vec![user]);
    let handle = repo.users_handle();

    let usecase = LoginUseCase {
        users: repo,
        hasher: fast_hasher(),
        jwt: jwt(),
    };
    let pair = usecase
        .execute(LoginInput {
            username: "ana".to_owned(),
            password: "pass1234".to_owned(),
        })
        .await
        .unwrap();

    assert!(!pair.access.is_empty());
    assert_ne!(pair.access, pair.refresh);
    assert!(handle.lock().unwrap()[0].last_login.is_some());
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let mut user = test_user(1, "ana", Rol::Cliente);
    user.password_hash = fast_hasher().hash("pass1234").await.unwrap();

    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        hasher: fast_hasher(),
        jwt: jwt(),
    };
    let result = usecase
        .execute(LoginInput {
            username: "ana".to_owned(),
            password: "wrong".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidCredentials)),
        "expected InvalidCredentials"
    );
}

#[tokio::test]
async fn should_reject_login_of_inactive_user() {
    let mut user = test_user(1, "ana", Rol::Cliente);
    user.password_hash = fast_hasher().hash("pass1234").await.unwrap();
    user.is_active = false;

    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user]),
        hasher: fast_hasher(),
        jwt: jwt(),
    };
    let result = usecase
        .execute(LoginInput {
            username: "ana".to_owned(),
            password: "pass1234".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

// ── RefreshUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_with_refresh_token() {
    let usecase = RefreshUseCase {
        users: MockUserRepo::new(vec![test_user(1, "ana", Rol::Cliente)]),
        jwt: jwt(),
    };
    let access = usecase
        .execute(&refresh_token(1, TEST_JWT_SECRET))
        .await
        .unwrap();
    assert!(!access.is_empty());
}

#[tokio::test]
async fn should_reject_access_token_on_refresh() {
    let usecase = RefreshUseCase {
        users: MockUserRepo::new(vec![test_user(1, "ana", Rol::Cliente)]),
        jwt: jwt(),
    };
    let result = usecase.execute(&access_token(1, TEST_JWT_SECRET)).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

#[tokio::test]
async fn should_reject_refresh_for_inactive_user() {
    let mut user = test_user(1, "ana", Rol::Cliente);
    user.is_active = false;
    let usecase = RefreshUseCase {
        users: MockUserRepo::new(vec![user]),
        jwt: jwt(),
    };
    let result = usecase.execute(&refresh_token(1, TEST_JWT_SECRET)).await;
    assert!(matches!(result, Err(ApiError::InvalidToken)));
}

// ── RegisterClienteUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_register_cliente_user_with_empresa() {
    let users = MockUserRepo::empty();
    let clientes_handle = users.clientes.clone();
    let usecase = RegisterClienteUseCase {
        users,
        clientes: MockClienteRepo::default(),
        config: MockConfigRepo::new(default_config(true)),
        hasher: fast_hasher(),
    };

    let mut input = register_input("ana");
    input.empresa_nombre = Some("Constructora Sur".to_owned());
    input.empresa_rut = Some("76.123.456-7".to_owned());
    let user = usecase.execute(input).await.unwrap();

    assert_eq!(user.rol(), Some(Rol::Cliente));
    assert!(!user.is_superuser);
    let clientes = clientes_handle.lock().unwrap();
    assert_eq!(clientes.len(), 1);
    assert_eq!(clientes[0].usuario_id, Some(user.id));
    assert_eq!(clientes[0].email, "ana@example.com");
}

#[tokio::test]
async fn should_skip_cliente_when_empresa_is_incomplete() {
    let users = MockUserRepo::empty();
    let clientes_handle = users.clientes.clone();
    let usecase = RegisterClienteUseCase {
        users,
        clientes: MockClienteRepo::default(),
        config: MockConfigRepo::new(default_config(true)),
        hasher: fast_hasher(),
    };

    let mut input = register_input("ana");
    input.empresa_nombre = Some("Constructora Sur".to_owned());
    usecase.execute(input).await.unwrap();

    assert!(clientes_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_username_on_register() {
    let usecase = RegisterClienteUseCase {
        users: MockUserRepo::new(vec![test_user(1, "ana", Rol::Cliente)]),
        clientes: MockClienteRepo::default(),
        config: MockConfigRepo::new(default_config(true)),
        hasher: fast_hasher(),
    };
    let result = usecase.execute(register_input("ana")).await;
    match result {
        Err(ApiError::Validation(fields)) => assert!(fields.get("username").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_taken_empresa_rut() {
    let usecase = RegisterClienteUseCase {
        users: MockUserRepo::empty(),
        clientes: MockClienteRepo::new(vec![test_cliente(1, "76.123.456-7", None)]),
        config: MockConfigRepo::new(default_config(true)),
        hasher: fast_hasher(),
    };
    let mut input = register_input("ana");
    input.empresa_nombre = Some("Otra".to_owned());
    input.empresa_rut = Some("76.123.456-7".to_owned());
    match usecase.execute(input).await {
        Err(ApiError::Validation(fields)) => assert!(fields.get("empresa_rut").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_registration_when_disabled() {
    let usecase = RegisterClienteUseCase {
        users: MockUserRepo::empty(),
        clientes: MockClienteRepo::default(),
        config: MockConfigRepo::new(default_config(false)),
        hasher: fast_hasher(),
    };
    let result = usecase.execute(register_input("ana")).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_ping() {
    let app = TestApp::new().await;
    let response = app.server.get("/api/ping/").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "API NoMasAccidentes funcionando ✅"
    );
}

#[tokio::test]
async fn should_issue_tokens_and_resolve_me() {
    let app = TestApp::new().await;
    app.seed_user("ana", "pass1234", Rol::Cliente).await;

    let response = app
        .server
        .post("/api/token/")
        .json(&json!({ "username": "ana", "password": "pass1234" }))
        .await;
    response.assert_status_ok();
    let tokens = response.json::<Value>();
    let access = tokens["access"].as_str().unwrap().to_owned();
    assert!(tokens["refresh"].is_string());

    let me = app
        .server
        .get("/api/auth/me/")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {access}")).unwrap(),
        )
        .await;
    me.assert_status_ok();
    let body = me.json::<Value>();
    assert_eq!(body["username"], "ana");
    assert_eq!(body["rol"], "CLIENTE");
    assert_eq!(body["profile"]["rol"], "CLIENTE");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn should_require_credentials_for_me() {
    let app = TestApp::new().await;
    let response = app.server.get("/api/auth/me/").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn should_reject_token_of_deactivated_user() {
    let app = TestApp::new().await;
    let user = app.seed_user("ana", "pass1234", Rol::Cliente).await;
    let (name, value) = app.auth(user.id);

    let changes = UserChanges {
        is_active: Some(false),
        ..UserChanges::default()
    };
    app.state.user_repo().update(user.id, &changes).await.unwrap();

    let response = app.server.get("/api/auth/me/").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_TOKEN");
}

#[tokio::test]
async fn should_reject_blank_login_fields() {
    let app = TestApp::new().await;
    let response = app
        .server
        .post("/api/token/")
        .json(&json!({ "username": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["fields"]["username"].is_array());
    assert!(body["fields"]["password"].is_array());
}

#[tokio::test]
async fn should_register_cliente_over_http() {
    let app = TestApp::new().await;
    let response = app
        .server
        .post("/api/auth/registro-cliente/")
        .json(&json!({
            "username": "nuevo",
            "password": "pass1234",
            "email": "nuevo@example.com",
            "empresa_nombre": "Constructora Sur",
            "empresa_rut": "76.123.456-7",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["profile"]["rol"], "CLIENTE");

    let login = app
        .server
        .post("/api/token/")
        .json(&json!({ "username": "nuevo", "password": "pass1234" }))
        .await;
    login.assert_status_ok();
}
