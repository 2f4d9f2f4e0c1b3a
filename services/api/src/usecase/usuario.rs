use tracing::info;

use nomas_domain::user::Rol;

use crate::domain::repository::UserRepository;
use crate::domain::types::{Caller, NewUser, Profile, User, UserChanges, validate_username};
use crate::error::{ApiError, FieldErrors};
use crate::infra::password::PasswordHasher;
use crate::usecase::{check_email, check_len, check_password, require_admin};

/// Profile fields accepted on user writes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub rut: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub rol: Option<Rol>,
}

pub(crate) fn check_profile(errors: &mut FieldErrors, profile: &ProfileInput) {
    if let Some(rut) = &profile.rut {
        check_len(errors, "rut", rut, 20);
    }
    if let Some(telefono) = &profile.telefono {
        check_len(errors, "telefono", telefono, 20);
    }
    if let Some(direccion) = &profile.direccion {
        check_len(errors, "direccion", direccion, 255);
    }
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListUsuariosUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsuariosUseCase<U> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<User>, ApiError> {
        require_admin(caller)?;
        self.users.list().await
    }
}

pub struct GetUsuarioUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUsuarioUseCase<U> {
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<User, ApiError> {
        require_admin(caller)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("usuario"))
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateUsuarioInput {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub profile: ProfileInput,
}

pub struct CreateUsuarioUseCase<U: UserRepository> {
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<U: UserRepository> CreateUsuarioUseCase<U> {
    pub async fn execute(&self, caller: &Caller, input: CreateUsuarioInput) -> Result<User, ApiError> {
        require_admin(caller)?;

        let mut errors = FieldErrors::new();
        if !validate_username(&input.username) {
            errors.add("username", "enter a valid username");
        } else if self.users.find_by_username(&input.username).await?.is_some() {
            errors.add("username", "a user with that username already exists");
        }
        check_password(&mut errors, "password", &input.password);
        check_len(&mut errors, "first_name", &input.first_name, 150);
        check_len(&mut errors, "last_name", &input.last_name, 150);
        check_email(&mut errors, "email", &input.email);
        check_profile(&mut errors, &input.profile);
        errors.into_result()?;

        let profile = input.profile;
        let user = NewUser {
            username: input.username,
            password_hash: self.hasher.hash(&input.password).await?,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_active: input.is_active,
            is_superuser: false,
            profile: Profile {
                rut: profile.rut.unwrap_or_default(),
                telefono: profile.telefono.unwrap_or_default(),
                direccion: profile.direccion.unwrap_or_default(),
                rol: profile.rol.unwrap_or_default(),
            },
        };
        let created = self.users.create(&user).await?;
        info!(user_id = created.id, by = caller.user_id(), "created usuario");
        Ok(created)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UpdateUsuarioInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
    pub profile: ProfileInput,
}

pub struct UpdateUsuarioUseCase<U: UserRepository> {
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<U: UserRepository> UpdateUsuarioUseCase<U> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: i32,
        input: UpdateUsuarioInput,
    ) -> Result<User, ApiError> {
        require_admin(caller)?;

        let mut errors = FieldErrors::new();
        if let Some(v) = &input.first_name {
            check_len(&mut errors, "first_name", v, 150);
        }
        if let Some(v) = &input.last_name {
            check_len(&mut errors, "last_name", v, 150);
        }
        if let Some(v) = &input.email {
            check_email(&mut errors, "email", v);
        }
        if let Some(v) = &input.password {
            check_password(&mut errors, "password", v);
        }
        check_profile(&mut errors, &input.profile);
        errors.into_result()?;

        let password_hash = match &input.password {
            Some(password) => Some(self.hasher.hash(password).await?),
            None => None,
        };
        let changes = UserChanges {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_active: input.is_active,
            password_hash,
            rut: input.profile.rut,
            telefono: input.profile.telefono,
            direccion: input.profile.direccion,
            rol: input.profile.rol,
        };
        self.users
            .update(id, &changes)
            .await?
            .ok_or(ApiError::NotFound("usuario"))
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteUsuarioUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUsuarioUseCase<U> {
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<(), ApiError> {
        require_admin(caller)?;
        if caller.user_id() == id {
            return Err(ApiError::Forbidden);
        }
        if !self.users.delete(id).await? {
            return Err(ApiError::NotFound("usuario"));
        }
        info!(user_id = id, by = caller.user_id(), "deleted usuario");
        Ok(())
    }
}

// ── Reset password ───────────────────────────────────────────────────────────

/// Validate `new_password` and store its hash for `user_id`.
pub(crate) async fn set_password<U: UserRepository>(
    users: &U,
    hasher: &PasswordHasher,
    user_id: i32,
    new_password: &str,
) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    check_password(&mut errors, "new_password", new_password);
    errors.into_result()?;

    let changes = UserChanges {
        password_hash: Some(hasher.hash(new_password).await?),
        ..UserChanges::default()
    };
    users
        .update(user_id, &changes)
        .await?
        .ok_or(ApiError::NotFound("usuario"))?;
    Ok(())
}

pub struct ResetPasswordUseCase<U: UserRepository> {
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<U: UserRepository> ResetPasswordUseCase<U> {
    pub async fn execute(&self, caller: &Caller, id: i32, new_password: &str) -> Result<(), ApiError> {
        require_admin(caller)?;
        set_password(&self.users, &self.hasher, id, new_password).await?;
        info!(user_id = id, by = caller.user_id(), "password reset");
        Ok(())
    }
}
