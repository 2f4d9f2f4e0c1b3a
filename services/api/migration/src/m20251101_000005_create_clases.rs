use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clases::Titulo).string_len(200).not_null())
                    .col(ColumnDef::new(Clases::Descripcion).text().not_null())
                    .col(ColumnDef::new(Clases::FechaSolicitada).date())
                    .col(
                        ColumnDef::new(Clases::Modalidad)
                            .string_len(50)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Clases::ClienteId).integer().not_null())
                    .col(ColumnDef::new(Clases::SolicitadaPorId).integer())
                    .col(ColumnDef::new(Clases::ProfesionalAsignadoId).integer())
                    .col(
                        ColumnDef::new(Clases::Estado)
                            .string_len(20)
                            .not_null()
                            .default("PENDIENTE"),
                    )
                    .col(
                        ColumnDef::new(Clases::CreadoEn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Clases::ActualizadoEn)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Clases::Table, Clases::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Clases::Table, Clases::SolicitadaPorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Clases::Table, Clases::ProfesionalAsignadoId)
                            .to(Profesionales::Table, Profesionales::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Clases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clases {
    Table,
    Id,
    Titulo,
    Descripcion,
    FechaSolicitada,
    Modalidad,
    ClienteId,
    SolicitadaPorId,
    ProfesionalAsignadoId,
    Estado,
    CreadoEn,
    ActualizadoEn,
}

#[derive(Iden)]
enum Clientes {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Profesionales {
    Table,
    Id,
}
