#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use crate::domain::types::{
    Cliente, ClienteChanges, ClienteFilter, ClaseChanges, ClaseFilter, ClaseView, ConfigChanges,
    NewClase, NewCliente, NewProfesional, NewUser, Profesional, ProfesionalChanges, SystemConfig,
    User, UserChanges,
};
use crate::error::ApiError;

/// Repository for user accounts and their profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, ApiError>;
    /// Insert the user and its profile in one transaction.
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    /// Insert the user, its profile and optionally a linked cliente in one transaction.
    async fn create_with_cliente(
        &self,
        user: &NewUser,
        cliente: Option<&NewCliente>,
    ) -> Result<User, ApiError>;
    /// Apply `changes`, creating the profile row if it is missing.
    /// Returns `None` when the user does not exist.
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, ApiError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> Result<(), ApiError>;
}

/// Repository for client companies.
pub trait ClienteRepository: Send + Sync {
    /// Clientes matching `filter`, ordered by `nombre`.
    async fn list(&self, filter: &ClienteFilter) -> Result<Vec<Cliente>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Cliente>, ApiError>;
    /// Whether another cliente (other than `except`) already uses `rut`.
    async fn rut_taken(&self, rut: &str, except: Option<i32>) -> Result<bool, ApiError>;
    /// Ids of every cliente whose responsible user is `user_id`, active or not.
    async fn ids_owned_by(&self, user_id: i32) -> Result<Vec<i32>, ApiError>;
    /// Lowest-id active cliente whose responsible user is `user_id`.
    async fn first_active_owned_by(&self, user_id: i32) -> Result<Option<Cliente>, ApiError>;
    async fn create(&self, cliente: &NewCliente) -> Result<Cliente, ApiError>;
    async fn update(&self, id: i32, changes: &ClienteChanges)
    -> Result<Option<Cliente>, ApiError>;
}

/// Repository for professionals and their linked user accounts.
pub trait ProfesionalRepository: Send + Sync {
    /// All profesionales ordered by the linked username.
    async fn list(&self) -> Result<Vec<Profesional>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Profesional>, ApiError>;
    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Profesional>, ApiError>;
    /// Insert user, profile and profesional rows in one transaction.
    async fn create_with_user(
        &self,
        user: &NewUser,
        profesional: &NewProfesional,
    ) -> Result<Profesional, ApiError>;
    /// The user's profesional row, inserted first if none exists yet.
    async fn get_or_create_for_user(
        &self,
        user_id: i32,
        profesional: &NewProfesional,
    ) -> Result<Profesional, ApiError>;
    /// Update the profesional and its user in one transaction.
    async fn update(
        &self,
        id: i32,
        user_changes: &UserChanges,
        changes: &ProfesionalChanges,
    ) -> Result<Option<Profesional>, ApiError>;
    /// Delete the profesional together with its user account.
    /// Returns `true` if a row was deleted.
    async fn delete_with_user(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for training-session requests.
pub trait ClaseRepository: Send + Sync {
    /// Clases matching `filter`, newest first.
    async fn list(&self, filter: &ClaseFilter) -> Result<Vec<ClaseView>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<ClaseView>, ApiError>;
    async fn create(&self, clase: &NewClase) -> Result<ClaseView, ApiError>;
    async fn update(&self, id: i32, changes: &ClaseChanges) -> Result<Option<ClaseView>, ApiError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for the singleton system configuration row.
pub trait ConfigRepository: Send + Sync {
    /// Load the configuration, inserting the default row on first access.
    async fn get_or_create(&self) -> Result<SystemConfig, ApiError>;
    async fn update(&self, changes: &ConfigChanges) -> Result<SystemConfig, ApiError>;
}
