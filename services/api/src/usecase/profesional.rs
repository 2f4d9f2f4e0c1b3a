use tracing::info;

use nomas_domain::user::Rol;

use crate::domain::repository::{ProfesionalRepository, UserRepository};
use crate::domain::types::{
    Caller, NewProfesional, NewUser, Profesional, ProfesionalChanges, Profile, UserChanges,
    validate_username,
};
use crate::error::{ApiError, FieldErrors};
use crate::infra::password::PasswordHasher;
use crate::usecase::usuario::{ProfileInput, check_profile, set_password};
use crate::usecase::{check_email, check_len, check_password, require_admin};

fn check_profesional_fields(
    errors: &mut FieldErrors,
    especialidad: Option<&str>,
    registro_profesional: Option<&str>,
) {
    if let Some(v) = especialidad {
        check_len(errors, "especialidad", v, 150);
    }
    if let Some(v) = registro_profesional {
        check_len(errors, "registro_profesional", v, 50);
    }
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListProfesionalesUseCase<P: ProfesionalRepository> {
    pub profesionales: P,
}

impl<P: ProfesionalRepository> ListProfesionalesUseCase<P> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Profesional>, ApiError> {
        require_admin(caller)?;
        self.profesionales.list().await
    }
}

pub struct GetProfesionalUseCase<P: ProfesionalRepository> {
    pub profesionales: P,
}

impl<P: ProfesionalRepository> GetProfesionalUseCase<P> {
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<Profesional, ApiError> {
        require_admin(caller)?;
        self.profesionales
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("profesional"))
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateProfesionalInput {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rut: String,
    pub telefono: String,
    pub direccion: String,
    pub especialidad: String,
    pub registro_profesional: String,
    pub disponible: bool,
}

pub struct CreateProfesionalUseCase<P: ProfesionalRepository, U: UserRepository> {
    pub profesionales: P,
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<P: ProfesionalRepository, U: UserRepository> CreateProfesionalUseCase<P, U> {
    /// Create the user account (role PROFESIONAL) and its profesional record together.
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateProfesionalInput,
    ) -> Result<Profesional, ApiError> {
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
        check_profile(
            &mut errors,
            &ProfileInput {
                rut: Some(input.rut.clone()),
                telefono: Some(input.telefono.clone()),
                direccion: Some(input.direccion.clone()),
                rol: None,
            },
        );
        check_profesional_fields(
            &mut errors,
            Some(&input.especialidad),
            Some(&input.registro_profesional),
        );
        errors.into_result()?;

        let user = NewUser {
            username: input.username,
            password_hash: self.hasher.hash(&input.password).await?,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_active: true,
            is_superuser: false,
            profile: Profile {
                rut: input.rut,
                telefono: input.telefono,
                direccion: input.direccion,
                rol: Rol::Profesional,
            },
        };
        let profesional = NewProfesional {
            especialidad: input.especialidad,
            registro_profesional: input.registro_profesional,
            disponible: input.disponible,
        };
        let created = self
            .profesionales
            .create_with_user(&user, &profesional)
            .await?;
        info!(
            profesional_id = created.id,
            user_id = created.user.id,
            by = caller.user_id(),
            "created profesional"
        );
        Ok(created)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

/// Flat partial update covering the user, its profile and the profesional row.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfesionalInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub rut: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub especialidad: Option<String>,
    pub registro_profesional: Option<String>,
    pub disponible: Option<bool>,
}

impl UpdateProfesionalInput {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(v) = &self.first_name {
            check_len(&mut errors, "first_name", v, 150);
        }
        if let Some(v) = &self.last_name {
            check_len(&mut errors, "last_name", v, 150);
        }
        if let Some(v) = &self.email {
            check_email(&mut errors, "email", v);
        }
        check_profile(
            &mut errors,
            &ProfileInput {
                rut: self.rut.clone(),
                telefono: self.telefono.clone(),
                direccion: self.direccion.clone(),
                rol: None,
            },
        );
        check_profesional_fields(
            &mut errors,
            self.especialidad.as_deref(),
            self.registro_profesional.as_deref(),
        );
        errors.into_result()
    }

    fn split(self) -> (UserChanges, ProfesionalChanges) {
        (
            UserChanges {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                is_active: self.is_active,
                rut: self.rut,
                telefono: self.telefono,
                direccion: self.direccion,
                ..UserChanges::default()
            },
            ProfesionalChanges {
                especialidad: self.especialidad,
                registro_profesional: self.registro_profesional,
                disponible: self.disponible,
            },
        )
    }
}

pub struct UpdateProfesionalUseCase<P: ProfesionalRepository> {
    pub profesionales: P,
}

impl<P: ProfesionalRepository> UpdateProfesionalUseCase<P> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: i32,
        input: UpdateProfesionalInput,
    ) -> Result<Profesional, ApiError> {
        require_admin(caller)?;
        input.validate()?;
        let (user_changes, changes) = input.split();
        self.profesionales
            .update(id, &user_changes, &changes)
            .await?
            .ok_or(ApiError::NotFound("profesional"))
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteProfesionalUseCase<P: ProfesionalRepository> {
    pub profesionales: P,
}

impl<P: ProfesionalRepository> DeleteProfesionalUseCase<P> {
    /// Remove the profesional and its user account.
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<(), ApiError> {
        require_admin(caller)?;
        if !self.profesionales.delete_with_user(id).await? {
            return Err(ApiError::NotFound("profesional"));
        }
        info!(profesional_id = id, by = caller.user_id(), "deleted profesional");
        Ok(())
    }
}

// ── Reset password ───────────────────────────────────────────────────────────

pub struct ResetProfesionalPasswordUseCase<P: ProfesionalRepository, U: UserRepository> {
    pub profesionales: P,
    pub users: U,
    pub hasher: PasswordHasher,
}

impl<P: ProfesionalRepository, U: UserRepository> ResetProfesionalPasswordUseCase<P, U> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: i32,
        new_password: &str,
    ) -> Result<(), ApiError> {
        require_admin(caller)?;
        let profesional = self
            .profesionales
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("profesional"))?;
        set_password(&self.users, &self.hasher, profesional.user.id, new_password).await?;
        info!(
            profesional_id = id,
            user_id = profesional.user.id,
            by = caller.user_id(),
            "password reset"
        );
        Ok(())
    }
}

// ── Self-service (/profesionales/me) ─────────────────────────────────────────

/// The caller's profesional record, created on first access.
async fn own_record<P: ProfesionalRepository>(
    profesionales: &P,
    caller: &Caller,
) -> Result<Profesional, ApiError> {
    if caller.rol() != Some(Rol::Profesional) {
        return Err(ApiError::Forbidden);
    }
    if let Some(found) = profesionales.find_by_user_id(caller.user_id()).await? {
        return Ok(found);
    }
    let record = profesionales
        .get_or_create_for_user(caller.user_id(), &NewProfesional::default())
        .await?;
    info!(
        profesional_id = record.id,
        user_id = caller.user_id(),
        "created missing profesional record"
    );
    Ok(record)
}

pub struct GetMyProfesionalUseCase<P: ProfesionalRepository> {
    pub profesionales: P,
}

impl<P: ProfesionalRepository> GetMyProfesionalUseCase<P> {
    pub async fn execute(&self, caller: &Caller) -> Result<Profesional, ApiError> {
        own_record(&self.profesionales, caller).await
    }
}

pub struct UpdateMyProfesionalUseCase<P: ProfesionalRepository> {
    pub profesionales: P,
}

impl<P: ProfesionalRepository> UpdateMyProfesionalUseCase<P> {
    /// `is_active` is not self-editable and is ignored.
    pub async fn execute(
        &self,
        caller: &Caller,
        mut input: UpdateProfesionalInput,
    ) -> Result<Profesional, ApiError> {
        let own = own_record(&self.profesionales, caller).await?;
        input.is_active = None;
        input.validate()?;
        let (user_changes, changes) = input.split();
        self.profesionales
            .update(own.id, &user_changes, &changes)
            .await?
            .ok_or(ApiError::NotFound("profesional"))
    }
}
