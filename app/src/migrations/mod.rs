pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_workflows_table;
mod m20250101_000003_create_agents_table;
mod m20250101_000004_create_workflow_steps_table;
mod m20250101_000005_create_metrics_table;
mod m20250101_000006_create_execution_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_workflows_table::Migration),
            Box::new(m20250101_000003_create_agents_table::Migration),
            Box::new(m20250101_000004_create_workflow_steps_table::Migration),
            Box::new(m20250101_000005_create_metrics_table::Migration),
            Box::new(m20250101_000006_create_execution_logs_table::Migration),
        ]
    }
}
