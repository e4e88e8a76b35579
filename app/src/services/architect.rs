//! Multi-agent blueprints for a described workflow
//!
//! With a language model bound, the design comes from the model. Any failure,
//! or no model at all, drops to a small rule-based architecture.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::llm::{ChatRequest, LanguageModel};

const ARCHITECT_PROMPT: &str = "You are a JSON-speaking AI Architect. Output valid JSON only.";
const COORDINATOR: &str = "Workflow Coordinator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub status: String,
    pub version: String,
    pub active_users: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Blueprint {
    pub agent_id: String,
    pub name: String,
    pub role: String,
    pub system_prompt: String,
    pub description: String,
    pub tools: Vec<String>,
    pub rationale: String,
    pub efficiency_gain: String,
    pub model: String,
    pub internal_flow: Vec<FlowNode>,
    pub dependencies: Vec<Dependency>,
    pub performance_metric: u32,
    pub executions_count: u32,
}

impl Blueprint {
    fn basic(id: &str, role: &str, prompt: &str, description: &str, model: &str) -> Self {
        Self {
            agent_id: id.to_string(),
            name: role.to_string(),
            role: role.to_string(),
            system_prompt: prompt.to_string(),
            description: description.to_string(),
            tools: Vec::new(),
            rationale: String::new(),
            efficiency_gain: String::new(),
            model: model.to_string(),
            internal_flow: Vec::new(),
            dependencies: Vec::new(),
            performance_metric: 95,
            executions_count: 1200,
        }
    }

    fn tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    fn pitch(mut self, rationale: &str, efficiency_gain: &str) -> Self {
        self.rationale = rationale.to_string();
        self.efficiency_gain = efficiency_gain.to_string();
        self
    }
}

/// Shape the model is asked to return for each agent
#[derive(Debug, Deserialize)]
struct DesignedAgent {
    role: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tools: Vec<String>,
    rationale: Option<String>,
    efficiency_gain: Option<String>,
    #[serde(default)]
    internal_flow: Vec<FlowNode>,
    #[serde(default)]
    dependencies: Vec<Dependency>,
    performance_metric: Option<u32>,
    executions_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Design {
    #[serde(default)]
    agents: Vec<DesignedAgent>,
}

/// Blueprints for `description`, from the model when one is bound
pub async fn design(description: &str, llm: Option<&dyn LanguageModel>, default_model: &str) -> Vec<Blueprint> {
    let Some(llm) = llm else {
        return mock_architecture(description, default_model);
    };

    match design_with_model(llm, description).await {
        Ok(blueprints) if !blueprints.is_empty() => blueprints,
        Ok(_) => {
            tracing::warn!("Architect model returned no agents, using rule-based design");
            mock_architecture(description, default_model)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Architect model failed, using rule-based design");
            mock_architecture(description, default_model)
        }
    }
}

async fn design_with_model(llm: &dyn LanguageModel, description: &str) -> Result<Vec<Blueprint>, String> {
    let prompt = format!(
        r#"You are an expert AI Architect. Design a multi-agent system for this workflow: "{}".

Return a JSON object with a key "agents" containing a list of agents.
For each agent, provide:
- role: Role Name
- description: Detailed responsibility
- tools: List of tools
- rationale: SPECIFIC reason why this agent is needed vs a simple script. be persuasive.
- efficiency_gain: precise comparison (e.g. "Manual: 15m -> AI: 30s")
- internal_flow: List of 3-5 steps for this specific agent's internal logic. Each step object: {{"id": "1", "label": "Step Name", "type": "trigger"|"action"|"condition"|"output"}}
- dependencies: List of 1-3 necessary integrations. Each object: {{"name": "Service Name", "status": "Connected", "version": "v1.0", "active_users": "10k"}}
- performance_metric: Integer (85-99) representing efficiency score.
- executions_count: Integer representing total runs.

Create as many agents as strictly necessary, but typically between 3-6 for a complex task.
Always include a "Coordinator" agent first."#,
        description
    );

    let reply: Value = llm
        .complete_json(ChatRequest::new(ARCHITECT_PROMPT, prompt).temperature(0.7).max_tokens(2000))
        .await
        .map_err(|e| e.to_string())?;
    let design: Design = serde_json::from_value(reply).map_err(|e| e.to_string())?;

    let mut rng = rand::thread_rng();
    let model = llm.model().to_string();

    Ok(design
        .agents
        .into_iter()
        .map(|agent| Blueprint {
            agent_id: format!("gen_{}", rng.gen_range(1000..=9999)),
            name: agent.role.clone(),
            system_prompt: agent.description.clone(),
            role: agent.role,
            description: agent.description,
            tools: agent.tools,
            rationale: agent
                .rationale
                .unwrap_or_else(|| "Essential for workflow orchestration.".to_string()),
            efficiency_gain: agent.efficiency_gain.unwrap_or_else(|| "10x speedup".to_string()),
            model: model.clone(),
            internal_flow: agent.internal_flow,
            dependencies: agent.dependencies,
            performance_metric: agent.performance_metric.unwrap_or_else(|| rng.gen_range(85..=99)),
            executions_count: agent.executions_count.unwrap_or_else(|| rng.gen_range(1000..=50000)),
        })
        .collect())
}

/// Coordinator plus one specialist picked by keyword
pub fn mock_architecture(description: &str, model: &str) -> Vec<Blueprint> {
    let lower = description.to_lowercase();

    let mut agents = vec![Blueprint::basic(
        "mock_1",
        COORDINATOR,
        "Manage state",
        "Orchestrates the overall process and manages state.",
        model,
    )
    .tools(&["State Management", "Task Dispatcher"])
    .pitch(
        "Central brain required to manage dependencies and error handling.",
        "Eliminates manual project management overhead.",
    )];

    if lower.contains("invoice") || lower.contains("receipt") {
        let mut processor = Blueprint::basic(
            "mock_2",
            "Document Processor",
            "Extract data",
            "Extracts structured data from invoices and receipts.",
            "gpt-3.5-turbo",
        )
        .tools(&["OCR", "LayoutLM", "Regex Extractor"])
        .pitch(
            "Manual data entry is error-prone; AI ensures 99.9% accuracy.",
            "Manual: 5 mins/doc -> AI: 2 secs/doc",
        );
        processor.internal_flow = [
            ("1", "OCR Scan", "trigger"),
            ("2", "Extract Fields", "action"),
            ("3", "Validate Data", "condition"),
            ("4", "Export JSON", "output"),
        ]
        .into_iter()
        .map(|(id, label, kind)| FlowNode {
            id: id.to_string(),
            label: label.to_string(),
            kind: kind.to_string(),
        })
        .collect();
        processor.dependencies = [
            ("OCR Service", "v2.0", "5k"),
            ("QuickBooks API", "v3.1", "2k"),
        ]
        .into_iter()
        .map(|(name, version, users)| Dependency {
            name: name.to_string(),
            status: "Connected".to_string(),
            version: version.to_string(),
            active_users: users.to_string(),
        })
        .collect();
        processor.performance_metric = 98;
        processor.executions_count = 15420;
        agents.push(processor);
    } else {
        agents.push(
            Blueprint::basic(
                "mock_default",
                "Task Executor",
                "Execute tasks",
                "Executes general purpose tasks.",
                model,
            )
            .tools(&["Web Search"])
            .pitch(
                "Handles execution of steps defined in the prompt.",
                "Manual: Varies -> AI: Instant",
            ),
        );
    }

    agents
}

#[derive(Debug, Clone, Serialize)]
pub struct MockStep {
    pub id: &'static str,
    pub description: String,
    pub actor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentSuggestion {
    pub role: String,
    pub description: String,
    pub suggested_model: String,
    pub confidence_score: f64,
}

/// Body of `POST /api/v1/analyze`
#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureReport {
    pub workflow_steps: Vec<MockStep>,
    pub agent_suggestions: Vec<AgentSuggestion>,
    pub agent_blueprints: Vec<Blueprint>,
    pub automated_percentage: u32,
    pub time_saving_estimate: String,
}

pub fn report(description: &str, blueprints: Vec<Blueprint>) -> ArchitectureReport {
    let trigger: String = description.chars().take(20).collect();
    let workflow_steps = vec![
        MockStep {
            id: "1",
            description: format!("Trigger: {}...", trigger),
            actor: "User",
        },
        MockStep {
            id: "2",
            description: "Process Data".to_string(),
            actor: "System",
        },
        MockStep {
            id: "3",
            description: "Finalize".to_string(),
            actor: "System",
        },
    ];

    let agent_suggestions = blueprints
        .iter()
        .map(|bp| AgentSuggestion {
            role: bp.role.clone(),
            description: bp.description.clone(),
            suggested_model: bp.model.clone(),
            confidence_score: if bp.role == COORDINATOR { 0.95 } else { 0.85 },
        })
        .collect();

    let mut rng = rand::thread_rng();

    ArchitectureReport {
        workflow_steps,
        agent_suggestions,
        agent_blueprints: blueprints,
        automated_percentage: rng.gen_range(60..=95),
        time_saving_estimate: format!("{} hours/week", rng.gen_range(2..=10)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::fake::FakeModel;
    use kit::expect;

    fn roles(blueprints: &[Blueprint]) -> Vec<&str> {
        blueprints.iter().map(|b| b.role.as_str()).collect()
    }

    #[test]
    fn test_mock_picks_specialist_by_keyword() {
        let invoices = mock_architecture("Process every Invoice we receive", "gpt-4");
        expect!(roles(&invoices)).to_equal(vec!["Workflow Coordinator", "Document Processor"]);
        expect!(invoices[1].internal_flow.clone()).to_have_length(4);
        expect!(invoices[1].model.clone()).to_equal("gpt-3.5-turbo".to_string());

        let generic = mock_architecture("Send a newsletter", "gpt-4");
        expect!(roles(&generic)).to_equal(vec!["Workflow Coordinator", "Task Executor"]);
        expect!(generic[1].agent_id.clone()).to_equal("mock_default".to_string());
    }

    #[tokio::test]
    async fn test_design_uses_model_reply() {
        let llm = FakeModel::replying(
            r#"{"agents": [
                {"role": "Coordinator", "description": "Runs the show", "tools": ["Queue"]},
                {"role": "Mailer", "description": "Sends mail", "performance_metric": 91}
            ]}"#,
        );
        let blueprints = design("email triage", Some(&llm), "gpt-4").await;

        expect!(roles(&blueprints)).to_equal(vec!["Coordinator", "Mailer"]);
        expect!(blueprints[0].agent_id.starts_with("gen_")).to_be_true();
        expect!(blueprints[0].rationale.clone()).to_equal("Essential for workflow orchestration.".to_string());
        expect!(blueprints[1].performance_metric).to_equal(91);
        expect!(blueprints[0].model.clone()).to_equal("fake".to_string());
    }

    #[tokio::test]
    async fn test_design_falls_back_on_failure() {
        let broken = FakeModel::replying("{\"agents\": \"nope\"}");
        let blueprints = design("receipt scanning", Some(&broken), "gpt-4").await;
        expect!(roles(&blueprints)).to_equal(vec!["Workflow Coordinator", "Document Processor"]);

        let failing = FakeModel::failing();
        let blueprints = design("anything", Some(&failing), "gpt-4").await;
        expect!(blueprints[1].role.clone()).to_equal("Task Executor".to_string());
    }

    #[test]
    fn test_report_shapes_suggestions() {
        let description = "Collect invoices from the shared inbox";
        let report = report(description, mock_architecture(description, "gpt-4"));

        expect!(report.workflow_steps[0].description.clone()).to_equal("Trigger: Collect invoices fro...".to_string());
        expect!(report.agent_suggestions[0].confidence_score).to_equal(0.95);
        expect!(report.agent_suggestions[1].confidence_score).to_equal(0.85);
        expect!(report.automated_percentage).to_be_between(60, 95);
        expect!(report.time_saving_estimate.clone()).to_contain("hours/week");
    }
}
