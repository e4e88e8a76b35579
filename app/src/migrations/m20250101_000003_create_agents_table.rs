use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_workflows_table::Workflows;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Agents::WorkflowId).uuid().not_null())
                    .col(ColumnDef::new(Agents::Role).string().not_null())
                    .col(ColumnDef::new(Agents::Description).text().null())
                    .col(ColumnDef::new(Agents::Status).string().not_null().default("Idle"))
                    .col(
                        ColumnDef::new(Agents::ConfidenceScore)
                            .double()
                            .not_null()
                            .default(0.95),
                    )
                    .col(
                        ColumnDef::new(Agents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agents_workflow_id")
                            .from(Agents::Table, Agents::WorkflowId)
                            .to(Workflows::Table, Workflows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Agents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Agents {
    Table,
    Id,
    WorkflowId,
    Role,
    Description,
    Status,
    ConfidenceScore,
    CreatedAt,
}
