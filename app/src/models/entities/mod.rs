//! SeaORM entities, one module per table

pub mod agents;
pub mod execution_logs;
pub mod metrics;
pub mod users;
pub mod workflow_steps;
pub mod workflows;
