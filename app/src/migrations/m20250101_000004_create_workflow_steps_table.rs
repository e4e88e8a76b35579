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
                    .table(WorkflowSteps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkflowSteps::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WorkflowSteps::WorkflowId).uuid().not_null())
                    .col(ColumnDef::new(WorkflowSteps::StepOrder).integer().not_null())
                    .col(ColumnDef::new(WorkflowSteps::Description).text().not_null())
                    .col(ColumnDef::new(WorkflowSteps::Actor).string().null())
                    .col(
                        ColumnDef::new(WorkflowSteps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_steps_workflow_id")
                            .from(WorkflowSteps::Table, WorkflowSteps::WorkflowId)
                            .to(Workflows::Table, Workflows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkflowSteps::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkflowSteps {
    Table,
    Id,
    WorkflowId,
    StepOrder,
    Description,
    Actor,
    CreatedAt,
}
