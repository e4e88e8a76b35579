//! HTTP handlers, one module per resource

pub mod agents;
pub mod analysis;
pub mod auth;
pub mod legacy;
pub mod metrics;
pub mod ml;
pub mod root;
pub mod workflows;
