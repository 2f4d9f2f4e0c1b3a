use sea_orm::DatabaseConnection;

use crate::config::JwtSettings;
use crate::infra::db::{
    DbClaseRepository, DbClienteRepository, DbConfigRepository, DbProfesionalRepository,
    DbUserRepository,
};
use crate::infra::password::PasswordHasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: JwtSettings,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn cliente_repo(&self) -> DbClienteRepository {
        DbClienteRepository {
            db: self.db.clone(),
        }
    }

    pub fn profesional_repo(&self) -> DbProfesionalRepository {
        DbProfesionalRepository {
            db: self.db.clone(),
        }
    }

    pub fn clase_repo(&self) -> DbClaseRepository {
        DbClaseRepository {
            db: self.db.clone(),
        }
    }

    pub fn config_repo(&self) -> DbConfigRepository {
        DbConfigRepository {
            db: self.db.clone(),
        }
    }
}
