//! sea-orm entities for the NoMasAccidentes API database.

pub mod clases;
pub mod clientes;
pub mod profesionales;
pub mod system_config;
pub mod user_profiles;
pub mod users;
