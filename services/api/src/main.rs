use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use nomas_api::config::ApiConfig;
use nomas_api::infra::db::DbUserRepository;
use nomas_api::infra::password::PasswordHasher;
use nomas_api::router::build_router;
use nomas_api::state::AppState;
use nomas_api::usecase::bootstrap::EnsureAdminsUseCase;
use nomas_api_migration::Migrator;

#[tokio::main]
async fn main() {
    nomas_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
    }

    let hasher = PasswordHasher {
        cost: config.bcrypt_cost,
    };

    let bootstrap = EnsureAdminsUseCase {
        users: DbUserRepository { db: db.clone() },
        hasher,
    };
    let created = bootstrap
        .execute(&config.bootstrap_admins)
        .await
        .expect("failed to provision admin accounts");
    info!(created, "admin accounts ensured");

    let state = AppState {
        db,
        jwt: config.jwt,
        hasher,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
