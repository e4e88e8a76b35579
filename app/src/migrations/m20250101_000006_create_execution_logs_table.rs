use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

/// Execution logs keep `workflow_id` without a foreign key: simulated runs
/// may not reference a stored workflow.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExecutionLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ExecutionLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ExecutionLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(ExecutionLogs::WorkflowId).uuid().null())
                    .col(ColumnDef::new(ExecutionLogs::AgentId).uuid().null())
                    .col(ColumnDef::new(ExecutionLogs::AgentRole).string().null())
                    .col(ColumnDef::new(ExecutionLogs::LatencyMs).integer().not_null())
                    .col(ColumnDef::new(ExecutionLogs::Success).boolean().not_null())
                    .col(ColumnDef::new(ExecutionLogs::CostUsd).double().not_null())
                    .col(ColumnDef::new(ExecutionLogs::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(ExecutionLogs::ExecutedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_execution_logs_user_id")
                            .from(ExecutionLogs::Table, ExecutionLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_execution_logs_user_executed_at")
                    .table(ExecutionLogs::Table)
                    .col(ExecutionLogs::UserId)
                    .col(ExecutionLogs::ExecutedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExecutionLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ExecutionLogs {
    Table,
    Id,
    UserId,
    WorkflowId,
    AgentId,
    AgentRole,
    LatencyMs,
    Success,
    CostUsd,
    ErrorMessage,
    ExecutedAt,
}
