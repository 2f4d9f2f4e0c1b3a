use chrono::{DateTime, NaiveDate, Utc};

use nomas_domain::clase::EstadoClase;
use nomas_domain::user::{Rol, display_name};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Maximum username length, in characters.
pub const MAX_USERNAME_LEN: usize = 150;

// ── Users ────────────────────────────────────────────────────────────────────

/// Role and contact data attached 1:1 to a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub rut: String,
    pub telefono: String,
    pub direccion: String,
    pub rol: Rol,
}

/// Account with its profile. `profile` is `None` only for accounts that were
/// never fully provisioned.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile: Option<Profile>,
}

impl User {
    /// Role used for authorization. Superusers without a profile act as ADMIN.
    pub fn rol(&self) -> Option<Rol> {
        match &self.profile {
            Some(profile) => Some(profile.rol),
            None if self.is_superuser => Some(Rol::Admin),
            None => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.rol() == Some(Rol::Admin)
    }

    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, &self.username)
    }
}

/// The authenticated user behind a request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
}

impl Caller {
    pub fn user_id(&self) -> i32 {
        self.user.id
    }

    pub fn rol(&self) -> Option<Rol> {
        self.user.rol()
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

/// Data for a new account; the profile row is written in the same transaction.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub profile: Profile,
}

/// Partial update of a user and its profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
    pub rut: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub rol: Option<Rol>,
}

impl UserChanges {
    pub fn touches_profile(&self) -> bool {
        self.rut.is_some() || self.telefono.is_some() || self.direccion.is_some() || self.rol.is_some()
    }
}

// ── Clientes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Cliente {
    pub id: i32,
    pub nombre: String,
    pub rut: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub usuario_id: Option<i32>,
    pub activo: bool,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCliente {
    pub nombre: String,
    pub rut: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub usuario_id: Option<i32>,
    pub activo: bool,
}

/// Partial update of a cliente. `usuario_id: Some(None)` unlinks the user.
#[derive(Debug, Clone, Default)]
pub struct ClienteChanges {
    pub nombre: Option<String>,
    pub rut: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub usuario_id: Option<Option<i32>>,
    pub activo: Option<bool>,
}

/// Which clientes a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClienteScope {
    All,
    OwnedBy(i32),
    Nothing,
}

#[derive(Debug, Clone, Copy)]
pub struct ClienteFilter {
    pub scope: ClienteScope,
    pub activo: Option<bool>,
}

impl ClienteFilter {
    pub fn matches(&self, cliente: &Cliente) -> bool {
        let in_scope = match self.scope {
            ClienteScope::All => true,
            ClienteScope::OwnedBy(user_id) => cliente.usuario_id == Some(user_id),
            ClienteScope::Nothing => false,
        };
        in_scope && self.activo.is_none_or(|activo| cliente.activo == activo)
    }
}

// ── Profesionales ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Profesional {
    pub id: i32,
    pub user: User,
    pub especialidad: String,
    pub registro_profesional: String,
    pub disponible: bool,
}

#[derive(Debug, Clone)]
pub struct NewProfesional {
    pub especialidad: String,
    pub registro_profesional: String,
    pub disponible: bool,
}

impl Default for NewProfesional {
    fn default() -> Self {
        Self {
            especialidad: String::new(),
            registro_profesional: String::new(),
            disponible: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfesionalChanges {
    pub especialidad: Option<String>,
    pub registro_profesional: Option<String>,
    pub disponible: Option<bool>,
}

// ── Clases ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Clase {
    pub id: i32,
    pub titulo: String,
    pub descripcion: String,
    pub fecha_solicitada: Option<NaiveDate>,
    pub modalidad: String,
    pub estado: EstadoClase,
    pub cliente_id: i32,
    pub solicitada_por_id: Option<i32>,
    pub profesional_asignado_id: Option<i32>,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

/// A clase with the display names of its related records.
#[derive(Debug, Clone)]
pub struct ClaseView {
    pub clase: Clase,
    pub cliente_nombre: String,
    pub solicitante_nombre: Option<String>,
    pub profesional_nombre: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewClase {
    pub titulo: String,
    pub descripcion: String,
    pub fecha_solicitada: Option<NaiveDate>,
    pub modalidad: String,
    pub estado: EstadoClase,
    pub cliente_id: i32,
    pub solicitada_por_id: Option<i32>,
    pub profesional_asignado_id: Option<i32>,
}

/// Partial update of a clase. Nullable references use `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct ClaseChanges {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub fecha_solicitada: Option<Option<NaiveDate>>,
    pub modalidad: Option<String>,
    pub estado: Option<EstadoClase>,
    pub cliente_id: Option<i32>,
    pub solicitada_por_id: Option<Option<i32>>,
    pub profesional_asignado_id: Option<Option<i32>>,
}

impl ClaseChanges {
    /// Wire names of the fields this update touches.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.titulo.is_some() {
            fields.push("titulo");
        }
        if self.descripcion.is_some() {
            fields.push("descripcion");
        }
        if self.fecha_solicitada.is_some() {
            fields.push("fecha_solicitada");
        }
        if self.modalidad.is_some() {
            fields.push("modalidad");
        }
        if self.estado.is_some() {
            fields.push("estado");
        }
        if self.cliente_id.is_some() {
            fields.push("cliente");
        }
        if self.solicitada_por_id.is_some() {
            fields.push("solicitada_por");
        }
        if self.profesional_asignado_id.is_some() {
            fields.push("profesional_asignado");
        }
        fields
    }
}

/// Rows of `clases` visible to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaseScope {
    All,
    /// Rows requested by `user_id` or belonging to one of `cliente_ids`.
    Cliente { user_id: i32, cliente_ids: Vec<i32> },
    /// Rows assigned to this profesional.
    Profesional { profesional_id: i32 },
    Nothing,
}

impl ClaseScope {
    pub fn permits(&self, clase: &Clase) -> bool {
        match self {
            Self::All => true,
            Self::Cliente {
                user_id,
                cliente_ids,
            } => {
                clase.solicitada_por_id == Some(*user_id) || cliente_ids.contains(&clase.cliente_id)
            }
            Self::Profesional { profesional_id } => {
                clase.profesional_asignado_id == Some(*profesional_id)
            }
            Self::Nothing => false,
        }
    }
}

/// Scope plus the optional list filters of `GET /api/clases/`.
#[derive(Debug, Clone)]
pub struct ClaseFilter {
    pub scope: ClaseScope,
    pub cliente_id: Option<i32>,
    pub profesional_id: Option<i32>,
    pub estado: Option<EstadoClase>,
}

impl ClaseFilter {
    pub fn unfiltered(scope: ClaseScope) -> Self {
        Self {
            scope,
            cliente_id: None,
            profesional_id: None,
            estado: None,
        }
    }

    pub fn matches(&self, clase: &Clase) -> bool {
        self.scope.permits(clase)
            && self.cliente_id.is_none_or(|id| clase.cliente_id == id)
            && self
                .profesional_id
                .is_none_or(|id| clase.profesional_asignado_id == Some(id))
            && self.estado.is_none_or(|estado| clase.estado == estado)
    }
}

// ── System configuration ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub nombre_sistema: String,
    pub razon_social: String,
    pub rut_empresa: String,
    pub direccion: String,
    pub telefono_contacto: String,
    pub email_contacto: String,
    pub sitio_web: String,
    pub dias_min_anticipacion_cancelacion: i32,
    pub permitir_registro_publico_clientes: bool,
    pub texto_portada: String,
    pub actualizado_en: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigChanges {
    pub nombre_sistema: Option<String>,
    pub razon_social: Option<String>,
    pub rut_empresa: Option<String>,
    pub direccion: Option<String>,
    pub telefono_contacto: Option<String>,
    pub email_contacto: Option<String>,
    pub sitio_web: Option<String>,
    pub dias_min_anticipacion_cancelacion: Option<i32>,
    pub permitir_registro_publico_clientes: Option<bool>,
    pub texto_portada: Option<String>,
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Usernames: 1-150 chars of letters, digits and `@ . + - _`.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if len == 0 || len > MAX_USERNAME_LEN {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Blank is allowed; otherwise a single `@` with non-empty sides and a dotted domain.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() {
        return true;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
