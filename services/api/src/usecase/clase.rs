use chrono::NaiveDate;
use tracing::info;

use nomas_domain::clase::EstadoClase;
use nomas_domain::user::Rol;

use crate::domain::repository::{
    ClaseRepository, ClienteRepository, ProfesionalRepository, UserRepository,
};
use crate::domain::types::{Caller, ClaseChanges, ClaseFilter, ClaseScope, ClaseView, NewClase};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::{add_missing_ref, check_len, check_required, require_admin};

/// Fields a CLIENTE may edit on their own clases.
const CLIENTE_EDITABLE: [&str; 4] = ["titulo", "descripcion", "fecha_solicitada", "modalidad"];

/// Fields a PROFESIONAL may edit on assigned clases.
const PROFESIONAL_EDITABLE: [&str; 1] = ["estado"];

/// Resolve which clases `caller` may see.
pub async fn resolve_scope<C, P>(
    caller: &Caller,
    clientes: &C,
    profesionales: &P,
) -> Result<ClaseScope, ApiError>
where
    C: ClienteRepository,
    P: ProfesionalRepository,
{
    if caller.is_admin() {
        return Ok(ClaseScope::All);
    }
    let scope = match caller.rol() {
        Some(Rol::Cliente) => ClaseScope::Cliente {
            user_id: caller.user_id(),
            cliente_ids: clientes.ids_owned_by(caller.user_id()).await?,
        },
        Some(Rol::Profesional) => match profesionales.find_by_user_id(caller.user_id()).await? {
            Some(profesional) => ClaseScope::Profesional {
                profesional_id: profesional.id,
            },
            None => ClaseScope::Nothing,
        },
        _ => ClaseScope::Nothing,
    };
    Ok(scope)
}

fn check_texts(
    errors: &mut FieldErrors,
    titulo: Option<&str>,
    descripcion: Option<&str>,
    modalidad: Option<&str>,
) {
    if let Some(v) = titulo {
        check_required(errors, "titulo", v);
        check_len(errors, "titulo", v, 200);
    }
    if let Some(v) = descripcion {
        check_required(errors, "descripcion", v);
    }
    if let Some(v) = modalidad {
        check_len(errors, "modalidad", v, 50);
    }
}

/// Check that referenced rows exist, recording a field error for each missing one.
async fn check_refs<C, P, U>(
    errors: &mut FieldErrors,
    (clientes, profesionales, users): (&C, &P, &U),
    cliente_id: Option<i32>,
    solicitada_por_id: Option<i32>,
    profesional_id: Option<i32>,
) -> Result<(), ApiError>
where
    C: ClienteRepository,
    P: ProfesionalRepository,
    U: UserRepository,
{
    if let Some(id) = cliente_id {
        if clientes.find_by_id(id).await?.is_none() {
            add_missing_ref(errors, "cliente", id);
        }
    }
    if let Some(id) = solicitada_por_id {
        if users.find_by_id(id).await?.is_none() {
            add_missing_ref(errors, "solicitada_por", id);
        }
    }
    if let Some(id) = profesional_id {
        if profesionales.find_by_id(id).await?.is_none() {
            add_missing_ref(errors, "profesional_asignado", id);
        }
    }
    Ok(())
}

// ── List / Get ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ListClasesQuery {
    pub cliente_id: Option<i32>,
    pub profesional_id: Option<i32>,
    pub estado: Option<EstadoClase>,
}

pub struct ListClasesUseCase<K, C, P>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
{
    pub clases: K,
    pub clientes: C,
    pub profesionales: P,
}

impl<K, C, P> ListClasesUseCase<K, C, P>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        query: ListClasesQuery,
    ) -> Result<Vec<ClaseView>, ApiError> {
        let scope = resolve_scope(caller, &self.clientes, &self.profesionales).await?;
        let filter = ClaseFilter {
            scope,
            cliente_id: query.cliente_id,
            profesional_id: query.profesional_id,
            estado: query.estado,
        };
        self.clases.list(&filter).await
    }
}

pub struct GetClaseUseCase<K, C, P>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
{
    pub clases: K,
    pub clientes: C,
    pub profesionales: P,
}

impl<K, C, P> GetClaseUseCase<K, C, P>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
{
    /// Rows outside the caller's scope answer 404, same as missing rows.
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<ClaseView, ApiError> {
        let scope = resolve_scope(caller, &self.clientes, &self.profesionales).await?;
        self.clases
            .find_by_id(id)
            .await?
            .filter(|view| scope.permits(&view.clase))
            .ok_or(ApiError::NotFound("clase"))
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreateClaseInput {
    pub titulo: String,
    pub descripcion: String,
    pub fecha_solicitada: Option<NaiveDate>,
    pub modalidad: String,
    pub estado: Option<EstadoClase>,
    pub cliente_id: Option<i32>,
    pub solicitada_por_id: Option<i32>,
    pub profesional_asignado_id: Option<i32>,
}

pub struct CreateClaseUseCase<K, C, P, U>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
    U: UserRepository,
{
    pub clases: K,
    pub clientes: C,
    pub profesionales: P,
    pub users: U,
}

impl<K, C, P, U> CreateClaseUseCase<K, C, P, U>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateClaseInput,
    ) -> Result<ClaseView, ApiError> {
        let mut errors = FieldErrors::new();
        check_texts(
            &mut errors,
            Some(&input.titulo),
            Some(&input.descripcion),
            Some(&input.modalidad),
        );

        let clase = if caller.is_admin() {
            if input.cliente_id.is_none() {
                errors.add("cliente", "this field is required");
            }
            check_refs(
                &mut errors,
                (&self.clientes, &self.profesionales, &self.users),
                input.cliente_id,
                input.solicitada_por_id,
                input.profesional_asignado_id,
            )
            .await?;
            NewClase {
                titulo: input.titulo,
                descripcion: input.descripcion,
                fecha_solicitada: input.fecha_solicitada,
                modalidad: input.modalidad,
                estado: input.estado.unwrap_or_default(),
                cliente_id: input.cliente_id.unwrap_or_default(),
                solicitada_por_id: input.solicitada_por_id,
                profesional_asignado_id: input.profesional_asignado_id,
            }
        } else if caller.rol() == Some(Rol::Cliente) {
            let own = self
                .clientes
                .first_active_owned_by(caller.user_id())
                .await?;
            if own.is_none() {
                errors.add("cliente", "no active cliente is linked to this user");
            }
            NewClase {
                titulo: input.titulo,
                descripcion: input.descripcion,
                fecha_solicitada: input.fecha_solicitada,
                modalidad: input.modalidad,
                estado: EstadoClase::Pendiente,
                cliente_id: own.map(|c| c.id).unwrap_or_default(),
                solicitada_por_id: Some(caller.user_id()),
                profesional_asignado_id: None,
            }
        } else {
            return Err(ApiError::Forbidden);
        };
        errors.into_result()?;

        let created = self.clases.create(&clase).await?;
        info!(
            clase_id = created.clase.id,
            cliente_id = created.clase.cliente_id,
            by = caller.user_id(),
            "created clase"
        );
        Ok(created)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

pub struct UpdateClaseUseCase<K, C, P, U>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
    U: UserRepository,
{
    pub clases: K,
    pub clientes: C,
    pub profesionales: P,
    pub users: U,
}

impl<K, C, P, U> UpdateClaseUseCase<K, C, P, U>
where
    K: ClaseRepository,
    C: ClienteRepository,
    P: ProfesionalRepository,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        id: i32,
        changes: ClaseChanges,
    ) -> Result<ClaseView, ApiError> {
        let scope = resolve_scope(caller, &self.clientes, &self.profesionales).await?;
        let current = self
            .clases
            .find_by_id(id)
            .await?
            .filter(|view| scope.permits(&view.clase))
            .ok_or(ApiError::NotFound("clase"))?;

        if !caller.is_admin() {
            let editable: &[&str] = match caller.rol() {
                Some(Rol::Cliente) => &CLIENTE_EDITABLE,
                Some(Rol::Profesional) => &PROFESIONAL_EDITABLE,
                _ => &[],
            };
            if changes
                .changed_fields()
                .iter()
                .any(|field| !editable.contains(field))
            {
                return Err(ApiError::Forbidden);
            }
        }

        let mut errors = FieldErrors::new();
        check_texts(
            &mut errors,
            changes.titulo.as_deref(),
            changes.descripcion.as_deref(),
            changes.modalidad.as_deref(),
        );
        check_refs(
            &mut errors,
            (&self.clientes, &self.profesionales, &self.users),
            changes.cliente_id,
            changes.solicitada_por_id.flatten(),
            changes.profesional_asignado_id.flatten(),
        )
        .await?;
        errors.into_result()?;

        let updated = self
            .clases
            .update(current.clase.id, &changes)
            .await?
            .ok_or(ApiError::NotFound("clase"))?;
        if let Some(estado) = changes.estado {
            info!(
                clase_id = id,
                from = %current.clase.estado,
                to = %estado,
                by = caller.user_id(),
                "clase estado changed"
            );
        }
        Ok(updated)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteClaseUseCase<K: ClaseRepository> {
    pub clases: K,
}

impl<K: ClaseRepository> DeleteClaseUseCase<K> {
    pub async fn execute(&self, caller: &Caller, id: i32) -> Result<(), ApiError> {
        require_admin(caller)?;
        if !self.clases.delete(id).await? {
            return Err(ApiError::NotFound("clase"));
        }
        info!(clase_id = id, by = caller.user_id(), "deleted clase");
        Ok(())
    }
}
