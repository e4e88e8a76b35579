//! Actions: the unit of work behind each endpoint
//!
//! Controllers resolve these from the container, so tests can swap them out.

pub mod auth;
pub mod metrics;
pub mod workflow;

pub use auth::{AccessToken, LoginAction, SendOtpAction, SignupAction, VerifyOtpAction};
pub use metrics::{RunSummary, RunWorkflowAction, TelemetryAction};
pub use workflow::{
    AddAgentAction, CreateWorkflowAction, DeleteWorkflowAction, DeployAgentAction,
    ListWorkflowsAction, ShowWorkflowAction, UpdateWorkflowAction, UserMetricsAction,
    WorkflowDetail,
};
