//! Models: entities plus query helpers
//!
//! Table definitions live in `entities/`; each model module re-exports its
//! entity and adds behavior and queries.

pub mod entities;

pub mod agents;
pub mod execution_logs;
pub mod metrics;
pub mod users;
pub mod workflow_steps;
pub mod workflows;
