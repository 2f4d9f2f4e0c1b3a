use tracing::info;

use nomas_domain::user::Rol;

use crate::domain::repository::{ClienteRepository, UserRepository};
use crate::domain::types::{
    Caller, Cliente, ClienteChanges, ClienteFilter, ClienteScope, NewCliente,
};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::{add_missing_ref, check_email, check_len, check_required, require_admin};

/// Clientes an authenticated caller may read.
pub fn cliente_scope(caller: &Caller) -> ClienteScope {
    if caller.is_admin() {
        return ClienteScope::All;
    }
    match caller.rol() {
        Some(Rol::Cliente) => ClienteScope::OwnedBy(caller.user_id()),
        _ => ClienteScope::Nothing,
    }
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListClientesUseCase<C: ClienteRepository> {
    pub clientes: C,
}

impl<C: ClienteRepository> ListClientesUseCase<C> {
    pub async fn execute(
        &self,
        caller: &Caller,
        activo: Option<bool>,
    ) -> Result<Vec<Cliente>, ApiError> {
        let filter = ClienteFilter {
            scope: cliente_scope(caller),
            activo,
        };
        self.clientes.list(&filter).await
    }
}

pub struct GetClienteUseCase<C: ClienteRepository> {
    pub clientes: C,
}

impl<C: ClienteRepository> GetClienteUseCase<C> {
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<Cliente, ApiError> {
        let filter = ClienteFilter {
            scope: cliente_scope(caller),
            activo: None,
        };
        self.clientes
            .find_by_id(id)
            .await?
            .filter(|c| filter.matches(c))
            .ok_or(ApiError::NotFound("cliente"))
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateClienteInput {
    pub nombre: String,
    pub rut: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub usuario_id: Option<i32>,
    pub activo: bool,
}

pub struct CreateClienteUseCase<C: ClienteRepository, U: UserRepository> {
    pub clientes: C,
    pub users: U,
}

impl<C: ClienteRepository, U: UserRepository> CreateClienteUseCase<C, U> {
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateClienteInput,
    ) -> Result<Cliente, ApiError> {
        require_admin(caller)?;

        let mut errors = FieldErrors::new();
        check_required(&mut errors, "nombre", &input.nombre);
        check_len(&mut errors, "nombre", &input.nombre, 150);
        check_required(&mut errors, "rut", &input.rut);
        check_len(&mut errors, "rut", &input.rut, 20);
        check_len(&mut errors, "direccion", &input.direccion, 255);
        check_len(&mut errors, "telefono", &input.telefono, 20);
        check_email(&mut errors, "email", &input.email);
        if self.clientes.rut_taken(&input.rut, None).await? {
            errors.add("rut", "a cliente with this rut already exists");
        }
        if let Some(user_id) = input.usuario_id {
            check_user_exists(&self.users, &mut errors, user_id).await?;
        }
        errors.into_result()?;

        let created = self
            .clientes
            .create(&NewCliente {
                nombre: input.nombre,
                rut: input.rut,
                direccion: input.direccion,
                telefono: input.telefono,
                email: input.email,
                usuario_id: input.usuario_id,
                activo: input.activo,
            })
            .await?;
        info!(cliente_id = created.id, by = caller.user_id(), "created cliente");
        Ok(created)
    }
}

async fn check_user_exists<U: UserRepository>(
    users: &U,
    errors: &mut FieldErrors,
    user_id: i32,
) -> Result<(), ApiError> {
    if users.find_by_id(user_id).await?.is_none() {
        add_missing_ref(errors, "usuario", user_id);
    }
    Ok(())
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdateClienteUseCase<C: ClienteRepository, U: UserRepository> {
    pub clientes: C,
    pub users: U,
}

impl<C: ClienteRepository, U: UserRepository> UpdateClienteUseCase<C, U> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: i32,
        changes: ClienteChanges,
    ) -> Result<Cliente, ApiError> {
        require_admin(caller)?;

        let mut errors = FieldErrors::new();
        if let Some(v) = &changes.nombre {
            check_required(&mut errors, "nombre", v);
            check_len(&mut errors, "nombre", v, 150);
        }
        if let Some(v) = &changes.rut {
            check_required(&mut errors, "rut", v);
            check_len(&mut errors, "rut", v, 20);
            if self.clientes.rut_taken(v, Some(id)).await? {
                errors.add("rut", "a cliente with this rut already exists");
            }
        }
        if let Some(v) = &changes.direccion {
            check_len(&mut errors, "direccion", v, 255);
        }
        if let Some(v) = &changes.telefono {
            check_len(&mut errors, "telefono", v, 20);
        }
        if let Some(v) = &changes.email {
            check_email(&mut errors, "email", v);
        }
        if let Some(Some(user_id)) = changes.usuario_id {
            check_user_exists(&self.users, &mut errors, user_id).await?;
        }
        errors.into_result()?;

        self.clientes
            .update(id, &changes)
            .await?
            .ok_or(ApiError::NotFound("cliente"))
    }
}

// ── Delete (soft) ────────────────────────────────────────────────────────────

pub struct DeactivateClienteUseCase<C: ClienteRepository> {
    pub clientes: C,
}

impl<C: ClienteRepository> DeactivateClienteUseCase<C> {
    /// Mark the cliente inactive; the row and its clases are kept.
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<(), ApiError> {
        require_admin(caller)?;
        let changes = ClienteChanges {
            activo: Some(false),
            ..ClienteChanges::default()
        };
        self.clientes
            .update(id, &changes)
            .await?
            .ok_or(ApiError::NotFound("cliente"))?;
        info!(cliente_id = id, by = caller.user_id(), "deactivated cliente");
        Ok(())
    }
}
