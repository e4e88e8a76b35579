use kit::request;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentInput {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsInput {
    #[serde(default)]
    pub automation_rate: Option<i32>,
    #[serde(default)]
    pub time_saved: Option<String>,
}

#[request]
pub struct CreateWorkflowRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepInput>,
    #[serde(default)]
    pub agents: Vec<AgentInput>,
    #[serde(default)]
    pub metrics: Option<MetricsInput>,
}

#[request]
pub struct UpdateWorkflowRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateWorkflowRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

#[request]
pub struct AddAgentRequest {
    #[validate(length(min = 1))]
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_confidence")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_score: f64,
    /// Ignored; the path decides the workflow
    #[serde(default)]
    pub workflow_id: Option<String>,
}

fn default_confidence() -> f64 {
    0.95
}
