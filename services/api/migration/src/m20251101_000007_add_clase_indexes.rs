use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Clases::Table)
                    .col(Clases::ClienteId)
                    .name("idx_clases_cliente_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Clases::Table)
                    .col(Clases::ProfesionalAsignadoId)
                    .name("idx_clases_profesional_asignado_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Clases::Table)
                    .col(Clases::SolicitadaPorId)
                    .name("idx_clases_solicitada_por_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Clientes::Table)
                    .col(Clientes::UsuarioId)
                    .name("idx_clientes_usuario_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_clientes_usuario_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_clases_solicitada_por_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_clases_profesional_asignado_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_clases_cliente_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Clases {
    Table,
    ClienteId,
    ProfesionalAsignadoId,
    SolicitadaPorId,
}

#[derive(Iden)]
enum Clientes {
    Table,
    UsuarioId,
}
