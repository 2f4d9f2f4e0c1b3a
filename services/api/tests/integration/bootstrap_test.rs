use nomas_api::config::AdminSeed;
use nomas_api::domain::repository::UserRepository;
use nomas_api::usecase::bootstrap::EnsureAdminsUseCase;
use nomas_domain::user::Rol;

use crate::helpers::{MockUserRepo, TestApp, fast_hasher, test_user};

fn seeds() -> Vec<AdminSeed> {
    vec![
        AdminSeed {
            username: "admin".to_owned(),
            password: "admin".to_owned(),
        },
        AdminSeed {
            username: "admin_2".to_owned(),
            password: "admin_2".to_owned(),
        },
    ]
}

#[tokio::test]
async fn should_skip_existing_admin_accounts() {
    let repo = MockUserRepo::new(vec![test_user(1, "admin", Rol::Cliente)]);
    let handle = repo.users_handle();
    let usecase = EnsureAdminsUseCase {
        users: repo,
        hasher: fast_hasher(),
    };

    let created = usecase.execute(&seeds()).await.unwrap();

    assert_eq!(created, 1);
    let users = handle.lock().unwrap();
    assert_eq!(users.len(), 2);
    // Existing account keeps its role.
    assert_eq!(users[0].rol(), Some(Rol::Cliente));
    assert!(users[1].is_superuser);
    assert_eq!(users[1].email, "admin_2@nomasaccidentes.local");
}

#[tokio::test]
async fn should_provision_admins_once() {
    let app = TestApp::new().await;
    let usecase = EnsureAdminsUseCase {
        users: app.state.user_repo(),
        hasher: fast_hasher(),
    };

    assert_eq!(usecase.execute(&seeds()).await.unwrap(), 2);
    assert_eq!(usecase.execute(&seeds()).await.unwrap(), 0);

    let admin = app
        .state
        .user_repo()
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert!(admin.is_admin());
    assert_eq!(admin.rol(), Some(Rol::Admin));
    assert!(fast_hasher().verify("admin", &admin.password_hash).await.unwrap());
}
