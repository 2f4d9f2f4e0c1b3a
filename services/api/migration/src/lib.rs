use sea_orm_migration::prelude::*;

mod m20251101_000001_create_users;
mod m20251101_000002_create_user_profiles;
mod m20251101_000003_create_clientes;
mod m20251101_000004_create_profesionales;
mod m20251101_000005_create_clases;
mod m20251101_000006_create_system_config;
mod m20251101_000007_add_clase_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_create_users::Migration),
            Box::new(m20251101_000002_create_user_profiles::Migration),
            Box::new(m20251101_000003_create_clientes::Migration),
            Box::new(m20251101_000004_create_profesionales::Migration),
            Box::new(m20251101_000005_create_clases::Migration),
            Box::new(m20251101_000006_create_system_config::Migration),
            Box::new(m20251101_000007_add_clase_indexes::Migration),
        ]
    }
}
