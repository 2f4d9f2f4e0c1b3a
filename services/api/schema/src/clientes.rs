use sea_orm::entity::prelude::*;

/// Contracting company. Deactivated through `activo`, never hard-deleted by the API.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clientes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    #[sea_orm(unique)]
    pub rut: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub usuario_id: Option<i32>,
    pub activo: bool,
    pub creado_en: chrono::DateTime<chrono::Utc>,
    pub actualizado_en: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UsuarioId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Usuario,
    #[sea_orm(has_many = "super::clases::Entity")]
    Clases,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usuario.def()
    }
}

impl Related<super::clases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
