use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{DateTime, Utc};

use nomas_api::config::JwtSettings;
use nomas_api::domain::repository::{ClienteRepository, ConfigRepository, UserRepository};
use nomas_api::domain::types::{
    Caller, Cliente, ClienteChanges, ClienteFilter, ConfigChanges, NewCliente, NewUser, Profile,
    SystemConfig, User, UserChanges,
};
use nomas_api::error::ApiError;
use nomas_api::infra::password::PasswordHasher;
use nomas_api::router::build_router;
use nomas_api::state::AppState;
use nomas_api_migration::Migrator;
use nomas_domain::user::Rol;

pub use nomas_testing::auth::TEST_JWT_SECRET;

/// Lowest bcrypt cost; keeps hashing out of the test runtime.
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher { cost: 4 }
}

pub fn jwt() -> JwtSettings {
    JwtSettings::new(TEST_JWT_SECRET)
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: i32, username: &str, rol: Rol) -> User {
    User {
        id,
        username: username.to_owned(),
        password_hash: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        email: format!("{username}@example.com"),
        is_active: true,
        is_superuser: false,
        date_joined: Utc::now(),
        last_login: None,
        profile: Some(Profile {
            rol,
            ..Profile::default()
        }),
    }
}

pub fn caller(id: i32, rol: Rol) -> Caller {
    Caller {
        user: test_user(id, &format!("user{id}"), rol),
    }
}

pub fn test_cliente(id: i32, rut: &str, usuario_id: Option<i32>) -> Cliente {
    Cliente {
        id,
        nombre: format!("Empresa {id}"),
        rut: rut.to_owned(),
        direccion: String::new(),
        telefono: String::new(),
        email: String::new(),
        usuario_id,
        activo: true,
        creado_en: Utc::now(),
        actualizado_en: Utc::now(),
    }
}

pub fn default_config(registration_open: bool) -> SystemConfig {
    SystemConfig {
        nombre_sistema: "No Más Accidentes".to_owned(),
        razon_social: String::new(),
        rut_empresa: String::new(),
        direccion: String::new(),
        telefono_contacto: String::new(),
        email_contacto: String::new(),
        sitio_web: String::new(),
        dias_min_anticipacion_cancelacion: 0,
        permitir_registro_publico_clientes: registration_open,
        texto_portada: String::new(),
        actualizado_en: Utc::now(),
    }
}

fn user_from_new(id: i32, new: &NewUser) -> User {
    User {
        id,
        username: new.username.clone(),
        password_hash: new.password_hash.clone(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        email: new.email.clone(),
        is_active: new.is_active,
        is_superuser: new.is_superuser,
        date_joined: Utc::now(),
        last_login: None,
        profile: Some(new.profile.clone()),
    }
}

fn cliente_from_new(id: i32, new: &NewCliente) -> Cliente {
    Cliente {
        id,
        nombre: new.nombre.clone(),
        rut: new.rut.clone(),
        direccion: new.direccion.clone(),
        telefono: new.telefono.clone(),
        email: new.email.clone(),
        usuario_id: new.usuario_id,
        activo: new.activo,
        creado_en: Utc::now(),
        actualizado_en: Utc::now(),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// Clientes written by `create_with_cliente`.
    pub clientes: Arc<Mutex<Vec<Cliente>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            clientes: Arc::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the internal user list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    fn next_id(users: &[User]) -> i32 {
        users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.create_with_cliente(user, None).await
    }

    async fn create_with_cliente(
        &self,
        user: &NewUser,
        cliente: Option<&NewCliente>,
    ) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let created = user_from_new(Self::next_id(&users), user);
        users.push(created.clone());
        if let Some(cliente) = cliente {
            let mut clientes = self.clientes.lock().unwrap();
            let mut linked = cliente.clone();
            linked.usuario_id = Some(created.id);
            let id = clientes.len() as i32 + 1;
            clientes.push(cliente_from_new(id, &linked));
        }
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &changes.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &changes.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &changes.email {
            user.email = v.clone();
        }
        if let Some(v) = changes.is_active {
            user.is_active = v;
        }
        if let Some(v) = &changes.password_hash {
            user.password_hash = v.clone();
        }
        if changes.touches_profile() {
            let profile = user.profile.get_or_insert_with(Profile::default);
            if let Some(v) = &changes.rut {
                profile.rut = v.clone();
            }
            if let Some(v) = &changes.telefono {
                profile.telefono = v.clone();
            }
            if let Some(v) = &changes.direccion {
                profile.direccion = v.clone();
            }
            if let Some(v) = changes.rol {
                profile.rol = v;
            }
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> Result<(), ApiError> {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.last_login = Some(at);
        }
        Ok(())
    }
}

// ── MockClienteRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockClienteRepo {
    pub clientes: Arc<Mutex<Vec<Cliente>>>,
}

impl MockClienteRepo {
    pub fn new(clientes: Vec<Cliente>) -> Self {
        Self {
            clientes: Arc::new(Mutex::new(clientes)),
        }
    }
}

impl ClienteRepository for MockClienteRepo {
    async fn list(&self, filter: &ClienteFilter) -> Result<Vec<Cliente>, ApiError> {
        let mut found: Vec<Cliente> = self
            .clientes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(found)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, ApiError> {
        Ok(self.clientes.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn rut_taken(&self, rut: &str, except: Option<i32>) -> Result<bool, ApiError> {
        Ok(self
            .clientes
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.rut == rut && Some(c.id) != except))
    }

    async fn ids_owned_by(&self, user_id: i32) -> Result<Vec<i32>, ApiError> {
        Ok(self
            .clientes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.usuario_id == Some(user_id))
            .map(|c| c.id)
            .collect())
    }

    async fn first_active_owned_by(&self, user_id: i32) -> Result<Option<Cliente>, ApiError> {
        Ok(self
            .clientes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.usuario_id == Some(user_id) && c.activo)
            .min_by_key(|c| c.id)
            .cloned())
    }

    async fn create(&self, cliente: &NewCliente) -> Result<Cliente, ApiError> {
        let mut clientes = self.clientes.lock().unwrap();
        let id = clientes.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let created = cliente_from_new(id, cliente);
        clientes.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: &ClienteChanges,
    ) -> Result<Option<Cliente>, ApiError> {
        let mut clientes = self.clientes.lock().unwrap();
        let Some(cliente) = clientes.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &changes.nombre {
            cliente.nombre = v.clone();
        }
        if let Some(v) = &changes.rut {
            cliente.rut = v.clone();
        }
        if let Some(v) = changes.usuario_id {
            cliente.usuario_id = v;
        }
        if let Some(v) = changes.activo {
            cliente.activo = v;
        }
        Ok(Some(cliente.clone()))
    }
}

// ── MockConfigRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockConfigRepo {
    pub config: Arc<Mutex<SystemConfig>>,
}

impl MockConfigRepo {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
        }
    }
}

impl ConfigRepository for MockConfigRepo {
    async fn get_or_create(&self) -> Result<SystemConfig, ApiError> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn update(&self, changes: &ConfigChanges) -> Result<SystemConfig, ApiError> {
        let mut config = self.config.lock().unwrap();
        if let Some(v) = changes.permitir_registro_publico_clientes {
            config.permitir_registro_publico_clientes = v;
        }
        if let Some(v) = &changes.nombre_sistema {
            config.nombre_sistema = v.clone();
        }
        Ok(config.clone())
    }
}

// ── TestApp ──────────────────────────────────────────────────────────────────

/// Router served over a fresh in-memory database.
pub struct TestApp {
    pub state: AppState,
    pub server: TestServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = AppState {
            db: nomas_testing::db::memory_db::<Migrator>().await,
            jwt: jwt(),
            hasher: fast_hasher(),
        };
        let server = TestServer::new(build_router(state.clone())).unwrap();
        Self { state, server }
    }

    /// Insert an active account with the given role directly through the repository.
    pub async fn seed_user(&self, username: &str, password: &str, rol: Rol) -> User {
        let user = NewUser {
            username: username.to_owned(),
            password_hash: self.state.hasher.hash(password).await.unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{username}@example.com"),
            is_active: true,
            is_superuser: rol == Rol::Admin,
            profile: Profile {
                rol,
                ..Profile::default()
            },
        };
        self.state.user_repo().create(&user).await.unwrap()
    }

    pub async fn seed_cliente(&self, nombre: &str, rut: &str, usuario_id: Option<i32>) -> Cliente {
        let cliente = NewCliente {
            nombre: nombre.to_owned(),
            rut: rut.to_owned(),
            direccion: String::new(),
            telefono: String::new(),
            email: String::new(),
            usuario_id,
            activo: true,
        };
        self.state.cliente_repo().create(&cliente).await.unwrap()
    }

    pub fn auth(&self, user_id: i32) -> (HeaderName, HeaderValue) {
        nomas_testing::auth::bearer(user_id, TEST_JWT_SECRET)
    }
}
