//! Workflow and agent actions, always scoped to the calling user

use chrono::Utc;
use kit::database::{Model as _, ModelMut};
use kit::{injectable, FrameworkError, DB};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::errors::{AgentNotFound, NoUpdateData, WorkflowNotFound};
use crate::models::{agents, metrics, workflow_steps, workflows};
use crate::requests::{AddAgentRequest, CreateWorkflowRequest, UpdateWorkflowRequest};

pub const STATUS_ACTIVE: &str = "Active";
const DEFAULT_CONFIDENCE: f64 = 0.95;

/// A workflow row with its relations embedded
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDetail {
    #[serde(flatten)]
    pub workflow: workflows::Model,
    pub agents: Vec<agents::Model>,
    pub workflow_steps: Vec<workflow_steps::Model>,
    pub metrics: Vec<metrics::Model>,
}

/// Load relations for many workflows with one query per table
pub async fn with_relations(rows: Vec<workflows::Model>) -> Result<Vec<WorkflowDetail>, FrameworkError> {
    let ids: Vec<Uuid> = rows.iter().map(|w| w.id).collect();

    let mut agents = group(agents::Model::for_workflows(&ids).await?, |a| a.workflow_id);
    let mut steps = group(workflow_steps::Model::for_workflows(&ids).await?, |s| s.workflow_id);
    let mut metrics = group(metrics::Model::for_workflows(&ids).await?, |m| m.workflow_id);

    Ok(rows
        .into_iter()
        .map(|workflow| WorkflowDetail {
            agents: agents.remove(&workflow.id).unwrap_or_default(),
            workflow_steps: steps.remove(&workflow.id).unwrap_or_default(),
            metrics: metrics.remove(&workflow.id).unwrap_or_default(),
            workflow,
        })
        .collect())
}

fn group<T>(rows: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

/// Malformed ids are indistinguishable from missing ones
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

async fn owned(user_id: Uuid, raw_id: &str) -> Result<workflows::Model, FrameworkError> {
    let id = parse_id(raw_id).ok_or(WorkflowNotFound)?;
    Ok(workflows::Model::find_owned(id, user_id)
        .await?
        .ok_or(WorkflowNotFound)?)
}

#[injectable]
pub struct CreateWorkflowAction;

impl CreateWorkflowAction {
    /// Workflow first, then steps, agents and metrics; a failure part way
    /// leaves the rows written so far
    pub async fn execute(&self, user_id: Uuid, form: CreateWorkflowRequest) -> Result<WorkflowDetail, FrameworkError> {
        let now = Utc::now();

        let workflow = workflows::Entity::insert_one(workflows::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(form.name),
            description: Set(form.description),
            status: Set(STATUS_ACTIVE.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .await?;

        let mut workflow_steps = Vec::with_capacity(form.steps.len());
        for (index, step) in form.steps.into_iter().enumerate() {
            let row = workflow_steps::Entity::insert_one(workflow_steps::ActiveModel {
                id: Set(Uuid::new_v4()),
                workflow_id: Set(workflow.id),
                step_order: Set(index as i32 + 1),
                description: Set(step.description.unwrap_or_default()),
                actor: Set(step.actor),
                created_at: Set(now),
            })
            .await?;
            workflow_steps.push(row);
        }

        let mut agents = Vec::with_capacity(form.agents.len());
        for agent in form.agents {
            let row = agents::Entity::insert_one(agents::ActiveModel {
                id: Set(Uuid::new_v4()),
                workflow_id: Set(workflow.id),
                role: Set(agent.role.unwrap_or_default()),
                description: Set(agent.description),
                status: Set(agent.status.unwrap_or_else(|| agents::STATUS_IDLE.to_string())),
                confidence_score: Set(agent.confidence_score.unwrap_or(DEFAULT_CONFIDENCE)),
                created_at: Set(now),
            })
            .await?;
            agents.push(row);
        }

        let mut metric_rows = Vec::new();
        if let Some(input) = form.metrics {
            let row = metrics::Entity::insert_one(metrics::ActiveModel {
                id: Set(Uuid::new_v4()),
                workflow_id: Set(workflow.id),
                automation_rate: Set(input.automation_rate),
                time_saved: Set(input.time_saved),
                recorded_at: Set(now),
            })
            .await?;
            metric_rows.push(row);
        }

        tracing::info!(
            workflow_id = %workflow.id,
            agents = agents.len(),
            steps = workflow_steps.len(),
            "Workflow created"
        );

        Ok(WorkflowDetail {
            workflow,
            agents,
            workflow_steps,
            metrics: metric_rows,
        })
    }
}

#[injectable]
pub struct ListWorkflowsAction;

impl ListWorkflowsAction {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<WorkflowDetail>, FrameworkError> {
        with_relations(workflows::Model::for_user(user_id).await?).await
    }
}

#[injectable]
pub struct ShowWorkflowAction;

impl ShowWorkflowAction {
    pub async fn execute(&self, user_id: Uuid, id: &str) -> Result<WorkflowDetail, FrameworkError> {
        let workflow = owned(user_id, id).await?;
        let mut details = with_relations(vec![workflow]).await?;
        details.pop().ok_or_else(|| WorkflowNotFound.into())
    }
}

#[injectable]
pub struct UpdateWorkflowAction;

impl UpdateWorkflowAction {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: &str,
        form: UpdateWorkflowRequest,
    ) -> Result<workflows::Model, FrameworkError> {
        if form.is_empty() {
            return Err(NoUpdateData.into());
        }
        let workflow = owned(user_id, id).await?;

        let mut active: workflows::ActiveModel = workflow.into();
        if let Some(name) = form.name {
            active.name = Set(name);
        }
        if let Some(description) = form.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = form.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        workflows::Entity::update_one(active).await
    }
}

#[injectable]
pub struct DeleteWorkflowAction;

impl DeleteWorkflowAction {
    pub async fn execute(&self, user_id: Uuid, id: &str) -> Result<(), FrameworkError> {
        let workflow = owned(user_id, id).await?;

        // Children go first so backends without enforced cascades stay consistent
        let db = DB::connection()?;
        let conn = db.inner();
        agents::Entity::delete_many()
            .filter(agents::Column::WorkflowId.eq(workflow.id))
            .exec(conn)
            .await?;
        workflow_steps::Entity::delete_many()
            .filter(workflow_steps::Column::WorkflowId.eq(workflow.id))
            .exec(conn)
            .await?;
        metrics::Entity::delete_many()
            .filter(metrics::Column::WorkflowId.eq(workflow.id))
            .exec(conn)
            .await?;
        workflows::Entity::delete_by_pk(workflow.id).await?;

        tracing::info!(workflow_id = %workflow.id, "Workflow deleted");
        Ok(())
    }
}

#[injectable]
pub struct AddAgentAction;

impl AddAgentAction {
    pub async fn execute(
        &self,
        user_id: Uuid,
        workflow_id: &str,
        form: AddAgentRequest,
    ) -> Result<agents::Model, FrameworkError> {
        let workflow = owned(user_id, workflow_id).await?;

        agents::Entity::insert_one(agents::ActiveModel {
            id: Set(Uuid::new_v4()),
            workflow_id: Set(workflow.id),
            role: Set(form.role),
            description: Set(form.description),
            status: Set(agents::STATUS_IDLE.to_string()),
            confidence_score: Set(form.confidence_score),
            created_at: Set(Utc::now()),
        })
        .await
    }
}

#[injectable]
pub struct DeployAgentAction;

impl DeployAgentAction {
    /// Mark the agent Active; another user's agent reads as missing
    pub async fn execute(&self, user_id: Uuid, agent_id: &str) -> Result<agents::Model, FrameworkError> {
        let id = parse_id(agent_id).ok_or(AgentNotFound)?;
        let agent = agents::Entity::find_by_pk(id).await?.ok_or(AgentNotFound)?;
        if workflows::Model::find_owned(agent.workflow_id, user_id)
            .await?
            .is_none()
        {
            return Err(AgentNotFound.into());
        }

        let mut active: agents::ActiveModel = agent.into();
        active.status = Set(agents::STATUS_ACTIVE.to_string());
        let agent = agents::Entity::update_one(active).await?;

        tracing::info!(agent_id = %agent.id, "Agent deployed");
        Ok(agent)
    }
}

#[injectable]
pub struct UserMetricsAction;

impl UserMetricsAction {
    /// Dashboard counters; any failure reads as zeros
    pub async fn execute(&self, user_id: Uuid) -> Value {
        match Self::collect(user_id).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "User metrics unavailable");
                json!({ "totalWorkflows": 0, "activeAgents": 0, "avgAutomation": 0 })
            }
        }
    }

    async fn collect(user_id: Uuid) -> Result<Value, FrameworkError> {
        let details = with_relations(workflows::Model::for_user(user_id).await?).await?;

        let total = details.len() as i64;
        let active_agents = details
            .iter()
            .flat_map(|d| d.agents.iter())
            .filter(|a| a.is_live())
            .count();
        // Metrics load oldest first, so the last row is the latest
        let automation: i64 = details
            .iter()
            .filter_map(|d| d.metrics.last())
            .filter_map(|m| m.automation_rate)
            .map(i64::from)
            .sum();
        let average = if total > 0 { automation / total } else { 0 };

        Ok(json!({
            "totalWorkflows": total,
            "activeAgents": active_agents,
            "avgAutomation": average,
        }))
    }
}
