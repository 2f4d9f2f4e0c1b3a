use sea_orm::entity::prelude::*;

/// Primary key of the only configuration row.
pub const SINGLETON_ID: i32 = 1;

/// Global settings, a single row with `id = 1` created on first access.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub nombre_sistema: String,
    pub razon_social: String,
    pub rut_empresa: String,
    pub direccion: String,
    pub telefono_contacto: String,
    pub email_contacto: String,
    pub sitio_web: String,
    pub dias_min_anticipacion_cancelacion: i32,
    pub permitir_registro_publico_clientes: bool,
    #[sea_orm(column_type = "Text")]
    pub texto_portada: String,
    pub actualizado_en: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
