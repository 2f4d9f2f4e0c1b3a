use sea_orm::entity::prelude::*;

/// Trainer linked 1:1 to a user with role `PROFESIONAL`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profesionales")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub especialidad: String,
    pub registro_profesional: String,
    pub disponible: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::clases::Entity")]
    ClasesAsignadas,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::clases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClasesAsignadas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
