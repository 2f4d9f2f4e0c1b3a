use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel as _, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::OnConflict,
};

use nomas_api_schema::{clases, clientes, profesionales, system_config, user_profiles, users};
use nomas_domain::clase::EstadoClase;
use nomas_domain::user::{Rol, display_name};

use crate::domain::repository::{
    ClaseRepository, ClienteRepository, ConfigRepository, ProfesionalRepository, UserRepository,
};
use crate::domain::types::{
    Clase, ClaseChanges, ClaseFilter, ClaseScope, ClaseView, Cliente, ClienteChanges,
    ClienteFilter, ClienteScope, ConfigChanges, NewClase, NewCliente, NewProfesional, NewUser,
    Profesional, ProfesionalChanges, Profile, SystemConfig, User, UserChanges,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let row = users::Entity::find_by_id(id)
            .find_also_related(user_profiles::Entity)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(row.map(|(u, p)| user_from_models(u, p)).transpose()?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let row = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .find_also_related(user_profiles::Entity)
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(row.map(|(u, p)| user_from_models(u, p)).transpose()?)
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let rows = users::Entity::find()
            .find_also_related(user_profiles::Entity)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        let users = rows
            .into_iter()
            .map(|(u, p)| user_from_models(u, p))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        self.create_with_cliente(user, None).await
    }

    async fn create_with_cliente(
        &self,
        user: &NewUser,
        cliente: Option<&NewCliente>,
    ) -> Result<User, ApiError> {
        let (model, profile) = self
            .db
            .transaction::<_, (users::Model, user_profiles::Model), DbErr>(|txn| {
                let user = user.clone();
                let cliente = cliente.cloned();
                Box::pin(async move {
                    let (model, profile) = insert_user(txn, &user).await?;
                    if let Some(mut cliente) = cliente {
                        cliente.usuario_id = Some(model.id);
                        insert_cliente(txn, &cliente).await?;
                    }
                    Ok((model, profile))
                })
            })
            .await
            .context("create user")?;
        Ok(user_from_models(model, Some(profile))?)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        let found = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move { apply_user_changes(txn, id, &changes).await })
            })
            .await
            .context("update user")?;
        if !found {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            last_login: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update last login")?;
        Ok(())
    }
}

async fn insert_user<C: ConnectionTrait>(
    db: &C,
    user: &NewUser,
) -> Result<(users::Model, user_profiles::Model), DbErr> {
    let model = users::ActiveModel {
        username: Set(user.username.clone()),
        password: Set(user.password_hash.clone()),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        email: Set(user.email.clone()),
        is_active: Set(user.is_active),
        is_superuser: Set(user.is_superuser),
        date_joined: Set(Utc::now()),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;
    let profile = user_profiles::ActiveModel {
        user_id: Set(model.id),
        rut: Set(user.profile.rut.clone()),
        telefono: Set(user.profile.telefono.clone()),
        direccion: Set(user.profile.direccion.clone()),
        rol: Set(user.profile.rol.as_str().to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok((model, profile))
}

/// Returns `false` when the user does not exist.
async fn apply_user_changes<C: ConnectionTrait>(
    db: &C,
    id: i32,
    changes: &UserChanges,
) -> Result<bool, DbErr> {
    let Some(model) = users::Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };
    let mut am = model.into_active_model();
    let mut dirty = false;
    if let Some(v) = &changes.first_name {
        am.first_name = Set(v.clone());
        dirty = true;
    }
    if let Some(v) = &changes.last_name {
        am.last_name = Set(v.clone());
        dirty = true;
    }
    if let Some(v) = &changes.email {
        am.email = Set(v.clone());
        dirty = true;
    }
    if let Some(v) = changes.is_active {
        am.is_active = Set(v);
        dirty = true;
    }
    if let Some(v) = &changes.password_hash {
        am.password = Set(v.clone());
        dirty = true;
    }
    if dirty {
        am.update(db).await?;
    }

    if changes.touches_profile() {
        let existing = user_profiles::Entity::find()
            .filter(user_profiles::Column::UserId.eq(id))
            .one(db)
            .await?;
        let is_new = existing.is_none();
        let mut am = match existing {
            Some(profile) => profile.into_active_model(),
            None => user_profiles::ActiveModel {
                user_id: Set(id),
                rut: Set(String::new()),
                telefono: Set(String::new()),
                direccion: Set(String::new()),
                rol: Set(Rol::default().as_str().to_owned()),
                ..Default::default()
            },
        };
        if let Some(v) = &changes.rut {
            am.rut = Set(v.clone());
        }
        if let Some(v) = &changes.telefono {
            am.telefono = Set(v.clone());
        }
        if let Some(v) = &changes.direccion {
            am.direccion = Set(v.clone());
        }
        if let Some(v) = changes.rol {
            am.rol = Set(v.as_str().to_owned());
        }
        if is_new {
            am.insert(db).await?;
        } else {
            am.update(db).await?;
        }
    }
    Ok(true)
}

fn profile_from_model(model: user_profiles::Model) -> anyhow::Result<Profile> {
    let rol = model
        .rol
        .parse::<Rol>()
        .with_context(|| format!("profile of user {}", model.user_id))?;
    Ok(Profile {
        rut: model.rut,
        telefono: model.telefono,
        direccion: model.direccion,
        rol,
    })
}

fn user_from_models(
    model: users::Model,
    profile: Option<user_profiles::Model>,
) -> anyhow::Result<User> {
    Ok(User {
        id: model.id,
        username: model.username,
        password_hash: model.password,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        is_active: model.is_active,
        is_superuser: model.is_superuser,
        date_joined: model.date_joined,
        last_login: model.last_login,
        profile: profile.map(profile_from_model).transpose()?,
    })
}

async fn users_by_ids(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, User>, ApiError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .find_also_related(user_profiles::Entity)
        .all(db)
        .await
        .context("load users by id")?;
    let users = rows
        .into_iter()
        .map(|(u, p)| user_from_models(u, p).map(|user| (user.id, user)))
        .collect::<anyhow::Result<HashMap<_, _>>>()?;
    Ok(users)
}

// ── Cliente repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClienteRepository {
    pub db: DatabaseConnection,
}

impl ClienteRepository for DbClienteRepository {
    async fn list(&self, filter: &ClienteFilter) -> Result<Vec<Cliente>, ApiError> {
        let mut query = clientes::Entity::find();
        match filter.scope {
            ClienteScope::All => {}
            ClienteScope::OwnedBy(user_id) => {
                query = query.filter(clientes::Column::UsuarioId.eq(user_id));
            }
            ClienteScope::Nothing => return Ok(Vec::new()),
        }
        if let Some(activo) = filter.activo {
            query = query.filter(clientes::Column::Activo.eq(activo));
        }
        let models = query
            .order_by_asc(clientes::Column::Nombre)
            .order_by_asc(clientes::Column::Id)
            .all(&self.db)
            .await
            .context("list clientes")?;
        Ok(models.into_iter().map(cliente_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, ApiError> {
        let model = clientes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find cliente by id")?;
        Ok(model.map(cliente_from_model))
    }

    async fn rut_taken(&self, rut: &str, except: Option<i32>) -> Result<bool, ApiError> {
        let mut query = clientes::Entity::find().filter(clientes::Column::Rut.eq(rut));
        if let Some(id) = except {
            query = query.filter(clientes::Column::Id.ne(id));
        }
        let model = query
            .one(&self.db)
            .await
            .context("find cliente by rut")?;
        Ok(model.is_some())
    }

    async fn ids_owned_by(&self, user_id: i32) -> Result<Vec<i32>, ApiError> {
        let models = clientes::Entity::find()
            .filter(clientes::Column::UsuarioId.eq(user_id))
            .order_by_asc(clientes::Column::Id)
            .all(&self.db)
            .await
            .context("list clientes owned by user")?;
        Ok(models.into_iter().map(|m| m.id).collect())
    }

    async fn first_active_owned_by(&self, user_id: i32) -> Result<Option<Cliente>, ApiError> {
        let model = clientes::Entity::find()
            .filter(clientes::Column::UsuarioId.eq(user_id))
            .filter(clientes::Column::Activo.eq(true))
            .order_by_asc(clientes::Column::Id)
            .one(&self.db)
            .await
            .context("find active cliente owned by user")?;
        Ok(model.map(cliente_from_model))
    }

    async fn create(&self, cliente: &NewCliente) -> Result<Cliente, ApiError> {
        let model = insert_cliente(&self.db, cliente)
            .await
            .context("create cliente")?;
        Ok(cliente_from_model(model))
    }

    async fn update(
        &self,
        id: i32,
        changes: &ClienteChanges,
    ) -> Result<Option<Cliente>, ApiError> {
        let Some(model) = clientes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find cliente for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(v) = &changes.nombre {
            am.nombre = Set(v.clone());
        }
        if let Some(v) = &changes.rut {
            am.rut = Set(v.clone());
        }
        if let Some(v) = &changes.direccion {
            am.direccion = Set(v.clone());
        }
        if let Some(v) = &changes.telefono {
            am.telefono = Set(v.clone());
        }
        if let Some(v) = &changes.email {
            am.email = Set(v.clone());
        }
        if let Some(v) = changes.usuario_id {
            am.usuario_id = Set(v);
        }
        if let Some(v) = changes.activo {
            am.activo = Set(v);
        }
        am.actualizado_en = Set(Utc::now());
        let model = am.update(&self.db).await.context("update cliente")?;
        Ok(Some(cliente_from_model(model)))
    }
}

async fn insert_cliente<C: ConnectionTrait>(
    db: &C,
    cliente: &NewCliente,
) -> Result<clientes::Model, DbErr> {
    let now = Utc::now();
    clientes::ActiveModel {
        nombre: Set(cliente.nombre.clone()),
        rut: Set(cliente.rut.clone()),
        direccion: Set(cliente.direccion.clone()),
        telefono: Set(cliente.telefono.clone()),
        email: Set(cliente.email.clone()),
        usuario_id: Set(cliente.usuario_id),
        activo: Set(cliente.activo),
        creado_en: Set(now),
        actualizado_en: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

fn cliente_from_model(model: clientes::Model) -> Cliente {
    Cliente {
        id: model.id,
        nombre: model.nombre,
        rut: model.rut,
        direccion: model.direccion,
        telefono: model.telefono,
        email: model.email,
        usuario_id: model.usuario_id,
        activo: model.activo,
        creado_en: model.creado_en,
        actualizado_en: model.actualizado_en,
    }
}

// ── Profesional repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfesionalRepository {
    pub db: DatabaseConnection,
}

impl DbProfesionalRepository {
    async fn with_users(
        &self,
        models: Vec<profesionales::Model>,
    ) -> Result<Vec<Profesional>, ApiError> {
        let mut users = users_by_ids(&self.db, models.iter().map(|m| m.user_id).collect()).await?;
        models
            .into_iter()
            .map(|model| -> Result<Profesional, ApiError> {
                let user = users
                    .remove(&model.user_id)
                    .with_context(|| format!("user of profesional {}", model.id))?;
                Ok(profesional_from_model(model, user))
            })
            .collect()
    }
}

impl ProfesionalRepository for DbProfesionalRepository {
    async fn list(&self) -> Result<Vec<Profesional>, ApiError> {
        let models = profesionales::Entity::find()
            .all(&self.db)
            .await
            .context("list profesionales")?;
        let mut profesionales = self.with_users(models).await?;
        profesionales.sort_by(|a, b| a.user.username.cmp(&b.user.username));
        Ok(profesionales)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Profesional>, ApiError> {
        let model = profesionales::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find profesional by id")?;
        Ok(self.with_users(model.into_iter().collect()).await?.pop())
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Profesional>, ApiError> {
        let model = profesionales::Entity::find()
            .filter(profesionales::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find profesional by user id")?;
        Ok(self.with_users(model.into_iter().collect()).await?.pop())
    }

    async fn create_with_user(
        &self,
        user: &NewUser,
        profesional: &NewProfesional,
    ) -> Result<Profesional, ApiError> {
        let id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                let user = user.clone();
                let profesional = profesional.clone();
                Box::pin(async move {
                    let (model, _) = insert_user(txn, &user).await?;
                    let created = insert_profesional(txn, model.id, &profesional).await?;
                    Ok(created.id)
                })
            })
            .await
            .context("create profesional with user")?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("profesional {id} missing after insert").into())
    }

    async fn get_or_create_for_user(
        &self,
        user_id: i32,
        profesional: &NewProfesional,
    ) -> Result<Profesional, ApiError> {
        let row = profesionales::ActiveModel {
            user_id: Set(user_id),
            especialidad: Set(profesional.especialidad.clone()),
            registro_profesional: Set(profesional.registro_profesional.clone()),
            disponible: Set(profesional.disponible),
            ..Default::default()
        };
        profesionales::Entity::insert(row)
            .on_conflict(
                OnConflict::column(profesionales::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create profesional")?;
        self.find_by_user_id(user_id).await?.ok_or_else(|| {
            anyhow::anyhow!("profesional for user {user_id} missing after insert").into()
        })
    }

    async fn update(
        &self,
        id: i32,
        user_changes: &UserChanges,
        changes: &ProfesionalChanges,
    ) -> Result<Option<Profesional>, ApiError> {
        let found = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let user_changes = user_changes.clone();
                let changes = changes.clone();
                Box::pin(async move {
                    let Some(model) = profesionales::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(false);
                    };
                    let user_id = model.user_id;
                    let mut am = model.into_active_model();
                    let mut dirty = false;
                    if let Some(v) = &changes.especialidad {
                        am.especialidad = Set(v.clone());
                        dirty = true;
                    }
                    if let Some(v) = &changes.registro_profesional {
                        am.registro_profesional = Set(v.clone());
                        dirty = true;
                    }
                    if let Some(v) = changes.disponible {
                        am.disponible = Set(v);
                        dirty = true;
                    }
                    if dirty {
                        am.update(txn).await?;
                    }
                    apply_user_changes(txn, user_id, &user_changes).await
                })
            })
            .await
            .context("update profesional")?;
        if !found {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete_with_user(&self, id: i32) -> Result<bool, ApiError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = profesionales::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(false);
                    };
                    profesionales::Entity::delete_by_id(model.id)
                        .exec(txn)
                        .await?;
                    user_profiles::Entity::delete_many()
                        .filter(user_profiles::Column::UserId.eq(model.user_id))
                        .exec(txn)
                        .await?;
                    users::Entity::delete_by_id(model.user_id).exec(txn).await?;
                    Ok(true)
                })
            })
            .await
            .context("delete profesional with user")?;
        Ok(deleted)
    }
}

async fn insert_profesional<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    profesional: &NewProfesional,
) -> Result<profesionales::Model, DbErr> {
    profesionales::ActiveModel {
        user_id: Set(user_id),
        especialidad: Set(profesional.especialidad.clone()),
        registro_profesional: Set(profesional.registro_profesional.clone()),
        disponible: Set(profesional.disponible),
        ..Default::default()
    }
    .insert(db)
    .await
}

fn profesional_from_model(model: profesionales::Model, user: User) -> Profesional {
    Profesional {
        id: model.id,
        user,
        especialidad: model.especialidad,
        registro_profesional: model.registro_profesional,
        disponible: model.disponible,
    }
}

// ── Clase repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClaseRepository {
    pub db: DatabaseConnection,
}

impl DbClaseRepository {
    /// Attach cliente, requester and profesional display names.
    async fn views(&self, models: Vec<clases::Model>) -> Result<Vec<ClaseView>, ApiError> {
        let mut cliente_ids: Vec<i32> = models.iter().map(|m| m.cliente_id).collect();
        cliente_ids.sort_unstable();
        cliente_ids.dedup();
        let clientes: HashMap<i32, String> = if cliente_ids.is_empty() {
            HashMap::new()
        } else {
            clientes::Entity::find()
                .filter(clientes::Column::Id.is_in(cliente_ids))
                .all(&self.db)
                .await
                .context("load clientes of clases")?
                .into_iter()
                .map(|c| (c.id, c.nombre))
                .collect()
        };

        let profesional_ids: Vec<i32> = models
            .iter()
            .filter_map(|m| m.profesional_asignado_id)
            .collect();
        let profesional_users: HashMap<i32, i32> = if profesional_ids.is_empty() {
            HashMap::new()
        } else {
            profesionales::Entity::find()
                .filter(profesionales::Column::Id.is_in(profesional_ids))
                .all(&self.db)
                .await
                .context("load profesionales of clases")?
                .into_iter()
                .map(|p| (p.id, p.user_id))
                .collect()
        };

        let mut user_ids: Vec<i32> = models
            .iter()
            .filter_map(|m| m.solicitada_por_id)
            .chain(profesional_users.values().copied())
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let names: HashMap<i32, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .context("load users of clases")?
                .into_iter()
                .map(|u| (u.id, display_name(&u.first_name, &u.last_name, &u.username)))
                .collect()
        };

        models
            .into_iter()
            .map(|model| -> Result<ClaseView, ApiError> {
                let cliente_nombre = clientes.get(&model.cliente_id).cloned().unwrap_or_default();
                let solicitante_nombre = model
                    .solicitada_por_id
                    .and_then(|id| names.get(&id).cloned());
                let profesional_nombre = model
                    .profesional_asignado_id
                    .and_then(|id| profesional_users.get(&id))
                    .and_then(|user_id| names.get(user_id).cloned());
                Ok(ClaseView {
                    clase: clase_from_model(model)?,
                    cliente_nombre,
                    solicitante_nombre,
                    profesional_nombre,
                })
            })
            .collect()
    }

    async fn view(&self, model: clases::Model) -> Result<ClaseView, ApiError> {
        let id = model.id;
        self.views(vec![model])
            .await?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("clase {id} vanished while loading names").into())
    }
}

impl ClaseRepository for DbClaseRepository {
    async fn list(&self, filter: &ClaseFilter) -> Result<Vec<ClaseView>, ApiError> {
        let Some(scope) = scope_condition(&filter.scope) else {
            return Ok(Vec::new());
        };
        let mut query = clases::Entity::find().filter(scope);
        if let Some(id) = filter.cliente_id {
            query = query.filter(clases::Column::ClienteId.eq(id));
        }
        if let Some(id) = filter.profesional_id {
            query = query.filter(clases::Column::ProfesionalAsignadoId.eq(id));
        }
        if let Some(estado) = filter.estado {
            query = query.filter(clases::Column::Estado.eq(estado.as_str()));
        }
        let models = query
            .order_by_desc(clases::Column::CreadoEn)
            .order_by_desc(clases::Column::Id)
            .all(&self.db)
            .await
            .context("list clases")?;
        self.views(models).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ClaseView>, ApiError> {
        let model = clases::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find clase by id")?;
        match model {
            Some(model) => Ok(Some(self.view(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, clase: &NewClase) -> Result<ClaseView, ApiError> {
        let now = Utc::now();
        let model = clases::ActiveModel {
            titulo: Set(clase.titulo.clone()),
            descripcion: Set(clase.descripcion.clone()),
            fecha_solicitada: Set(clase.fecha_solicitada),
            modalidad: Set(clase.modalidad.clone()),
            cliente_id: Set(clase.cliente_id),
            solicitada_por_id: Set(clase.solicitada_por_id),
            profesional_asignado_id: Set(clase.profesional_asignado_id),
            estado: Set(clase.estado.as_str().to_owned()),
            creado_en: Set(now),
            actualizado_en: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create clase")?;
        self.view(model).await
    }

    async fn update(&self, id: i32, changes: &ClaseChanges) -> Result<Option<ClaseView>, ApiError> {
        let Some(model) = clases::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find clase for update")?
        else {
            return Ok(None);
        };
        let mut am = model.into_active_model();
        if let Some(v) = &changes.titulo {
            am.titulo = Set(v.clone());
        }
        if let Some(v) = &changes.descripcion {
            am.descripcion = Set(v.clone());
        }
        if let Some(v) = changes.fecha_solicitada {
            am.fecha_solicitada = Set(v);
        }
        if let Some(v) = &changes.modalidad {
            am.modalidad = Set(v.clone());
        }
        if let Some(v) = changes.estado {
            am.estado = Set(v.as_str().to_owned());
        }
        if let Some(v) = changes.cliente_id {
            am.cliente_id = Set(v);
        }
        if let Some(v) = changes.solicitada_por_id {
            am.solicitada_por_id = Set(v);
        }
        if let Some(v) = changes.profesional_asignado_id {
            am.profesional_asignado_id = Set(v);
        }
        am.actualizado_en = Set(Utc::now());
        let model = am.update(&self.db).await.context("update clase")?;
        Ok(Some(self.view(model).await?))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = clases::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete clase")?;
        Ok(result.rows_affected > 0)
    }
}

/// SQL condition for a visibility scope; `None` when nothing is visible.
fn scope_condition(scope: &ClaseScope) -> Option<Condition> {
    match scope {
        ClaseScope::All => Some(Condition::all()),
        ClaseScope::Cliente {
            user_id,
            cliente_ids,
        } => {
            let mut any = Condition::any().add(clases::Column::SolicitadaPorId.eq(*user_id));
            if !cliente_ids.is_empty() {
                any = any.add(clases::Column::ClienteId.is_in(cliente_ids.iter().copied()));
            }
            Some(any)
        }
        ClaseScope::Profesional { profesional_id } => {
            Some(Condition::all().add(clases::Column::ProfesionalAsignadoId.eq(*profesional_id)))
        }
        ClaseScope::Nothing => None,
    }
}

fn clase_from_model(model: clases::Model) -> anyhow::Result<Clase> {
    let estado = model
        .estado
        .parse::<EstadoClase>()
        .with_context(|| format!("estado of clase {}", model.id))?;
    Ok(Clase {
        id: model.id,
        titulo: model.titulo,
        descripcion: model.descripcion,
        fecha_solicitada: model.fecha_solicitada,
        modalidad: model.modalidad,
        estado,
        cliente_id: model.cliente_id,
        solicitada_por_id: model.solicitada_por_id,
        profesional_asignado_id: model.profesional_asignado_id,
        creado_en: model.creado_en,
        actualizado_en: model.actualizado_en,
    })
}

// ── Config repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbConfigRepository {
    pub db: DatabaseConnection,
}

impl DbConfigRepository {
    async fn get_or_create_model(&self) -> Result<system_config::Model, ApiError> {
        let found = system_config::Entity::find_by_id(system_config::SINGLETON_ID)
            .one(&self.db)
            .await
            .context("find system config")?;
        if let Some(model) = found {
            return Ok(model);
        }
        // Remaining columns take their defaults from the schema.
        let row = system_config::ActiveModel {
            id: Set(system_config::SINGLETON_ID),
            actualizado_en: Set(Utc::now()),
            ..Default::default()
        };
        system_config::Entity::insert(row)
            .on_conflict(
                OnConflict::column(system_config::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create system config")?;
        let model = system_config::Entity::find_by_id(system_config::SINGLETON_ID)
            .one(&self.db)
            .await
            .context("reload system config")?
            .context("system config missing after insert")?;
        Ok(model)
    }
}

impl ConfigRepository for DbConfigRepository {
    async fn get_or_create(&self) -> Result<SystemConfig, ApiError> {
        Ok(config_from_model(self.get_or_create_model().await?))
    }

    async fn update(&self, changes: &ConfigChanges) -> Result<SystemConfig, ApiError> {
        let mut am = self.get_or_create_model().await?.into_active_model();
        if let Some(v) = &changes.nombre_sistema {
            am.nombre_sistema = Set(v.clone());
        }
        if let Some(v) = &changes.razon_social {
            am.razon_social = Set(v.clone());
        }
        if let Some(v) = &changes.rut_empresa {
            am.rut_empresa = Set(v.clone());
        }
        if let Some(v) = &changes.direccion {
            am.direccion = Set(v.clone());
        }
        if let Some(v) = &changes.telefono_contacto {
            am.telefono_contacto = Set(v.clone());
        }
        if let Some(v) = &changes.email_contacto {
            am.email_contacto = Set(v.clone());
        }
        if let Some(v) = &changes.sitio_web {
            am.sitio_web = Set(v.clone());
        }
        if let Some(v) = changes.dias_min_anticipacion_cancelacion {
            am.dias_min_anticipacion_cancelacion = Set(v);
        }
        if let Some(v) = changes.permitir_registro_publico_clientes {
            am.permitir_registro_publico_clientes = Set(v);
        }
        if let Some(v) = &changes.texto_portada {
            am.texto_portada = Set(v.clone());
        }
        am.actualizado_en = Set(Utc::now());
        let model = am.update(&self.db).await.context("update system config")?;
        Ok(config_from_model(model))
    }
}

fn config_from_model(model: system_config::Model) -> SystemConfig {
    SystemConfig {
        nombre_sistema: model.nombre_sistema,
        razon_social: model.razon_social,
        rut_empresa: model.rut_empresa,
        direccion: model.direccion,
        telefono_contacto: model.telefono_contacto,
        email_contacto: model.email_contacto,
        sitio_web: model.sitio_web,
        dias_min_anticipacion_cancelacion: model.dias_min_anticipacion_cancelacion,
        permitir_registro_publico_clientes: model.permitir_registro_publico_clientes,
        texto_portada: model.texto_portada,
        actualizado_en: model.actualizado_en,
    }
}
