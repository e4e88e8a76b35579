//! Validated request bodies
//!
//! Each `#[request]` struct is parsed from JSON and checked with `validator`
//! before the handler runs; failures answer 422.

pub mod analysis;
pub mod auth;
pub mod ml;
pub mod workflow;

pub use analysis::{AnalyzeWorkflowRequest, ArchitectRequest};
pub use auth::{LoginRequest, SendOtpRequest, SignupRequest, VerifyOtpRequest};
pub use ml::{AnomalyRequest, PredictRequest, TelemetryQuery};
pub use workflow::{AddAgentRequest, AgentInput, CreateWorkflowRequest, MetricsInput, StepInput, UpdateWorkflowRequest};
