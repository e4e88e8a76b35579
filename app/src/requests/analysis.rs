use kit::request;

#[request]
pub struct AnalyzeWorkflowRequest {
    pub workflow_id: String,
    pub workflow_description: String,
    #[serde(default)]
    pub workflow_steps: Option<Vec<String>>,
}

#[request]
pub struct ArchitectRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default = "default_workflow_type")]
    pub workflow_type: String,
}

impl ArchitectRequest {
    /// The text to design for: the description, else the pasted content
    pub fn text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.text_content.as_deref())
            .unwrap_or_default()
    }
}

fn default_workflow_type() -> String {
    "generic".to_string()
}
