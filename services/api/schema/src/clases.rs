use sea_orm::entity::prelude::*;

/// Training-session request.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub titulo: String,
    #[sea_orm(column_type = "Text")]
    pub descripcion: String,
    pub fecha_solicitada: Option<chrono::NaiveDate>,
    pub modalidad: String,
    pub cliente_id: i32,
    pub solicitada_por_id: Option<i32>,
    pub profesional_asignado_id: Option<i32>,
    /// `PENDIENTE`, `ASIGNADA`, `ACEPTADA`, `RECHAZADA` or `COMPLETADA`.
    pub estado: String,
    pub creado_en: chrono::DateTime<chrono::Utc>,
    pub actualizado_en: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clientes::Entity",
        from = "Column::ClienteId",
        to = "super::clientes::Column::Id",
        on_delete = "Cascade"
    )]
    Cliente,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SolicitadaPorId",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    SolicitadaPor,
    #[sea_orm(
        belongs_to = "super::profesionales::Entity",
        from = "Column::ProfesionalAsignadoId",
        to = "super::profesionales::Column::Id",
        on_delete = "SetNull"
    )]
    ProfesionalAsignado,
}

impl Related<super::clientes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl Related<super::profesionales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProfesionalAsignado.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
