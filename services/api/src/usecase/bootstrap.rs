use tracing::info;

use nomas_domain::user::Rol;

use crate::config::AdminSeed;
use crate::domain::repository::UserRepository;
use crate::domain::types::{NewUser, Profile};
use crate::error::ApiError;
use crate::infra::password::PasswordHasher;

/// Domain used for the email of provisioned admin accounts.
pub const ADMIN_EMAIL_DOMAIN: &str = "nomasaccidentes.local";

pub struct EnsureAdminsUseCase<U: UserRepository> {
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<U: UserRepository> EnsureAdminsUseCase<U> {
    /// Create every missing admin account. Existing usernames are left untouched.
    /// Returns the number of accounts created.
    pub async fn execute(&self, seeds: &[AdminSeed]) -> Result<usize, ApiError> {
        let mut created = 0;
        for seed in seeds {
            if self.users.find_by_username(&seed.username).await?.is_some() {
                continue;
            }
            let user = NewUser {
                username: seed.username.clone(),
                password_hash: self.hasher.hash(&seed.password).await?,
                first_name: String::new(),
                last_name: String::new(),
                email: format!("{}@{ADMIN_EMAIL_DOMAIN}", seed.username),
                is_active: true,
                is_superuser: true,
                profile: Profile {
                    rol: Rol::Admin,
                    ..Profile::default()
                },
            };
            let admin = self.users.create(&user).await?;
            info!(user_id = admin.id, username = %admin.username, "provisioned admin account");
            created += 1;
        }
        Ok(created)
    }
}
