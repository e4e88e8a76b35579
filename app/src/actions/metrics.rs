//! Telemetry and simulated workflow runs

use chrono::Utc;
use kit::database::ModelMut;
use kit::{injectable, FrameworkError};
use sea_orm::prelude::Uuid;
use sea_orm::Set;
use serde::Serialize;

use super::workflow::parse_id;
use crate::models::{agents, execution_logs, workflows};
use crate::services::telemetry::{self, SimulatedRun, Telemetry, TimeWindow};

#[injectable]
pub struct TelemetryAction;

impl TelemetryAction {
    /// Real aggregates when the window has runs, sample data otherwise
    pub async fn execute(&self, user_id: Uuid, window: TimeWindow) -> Result<Telemetry, FrameworkError> {
        if workflows::Model::count_for_user(user_id).await? == 0 {
            return Ok(telemetry::empty(window));
        }

        let now = Utc::now();
        let logs = execution_logs::Model::for_user_since(user_id, now - window.duration()).await?;
        match telemetry::aggregate(window, &logs, now) {
            Some(report) => Ok(report),
            None => {
                tracing::debug!(user_id = %user_id, window = window.as_str(), "No executions in window, using sample telemetry");
                Ok(telemetry::synthetic(user_id, window, now))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub message: String,
    pub executions_logged: usize,
    pub logs: Vec<execution_logs::Model>,
}

#[injectable]
pub struct RunWorkflowAction;

impl RunWorkflowAction {
    pub async fn execute(&self, user_id: Uuid, raw_id: &str) -> Result<RunSummary, FrameworkError> {
        let workflow_id = parse_id(raw_id);

        let workflow = match workflow_id {
            Some(id) => workflows::Model::find_owned(id, user_id).await?,
            None => None,
        };
        let roster: Vec<(Uuid, String)> = match &workflow {
            Some(w) => agents::Model::for_workflows(&[w.id])
                .await?
                .into_iter()
                .map(|a| (a.id, a.role))
                .collect(),
            None => Vec::new(),
        };

        let (runs, message) = {
            let mut rng = rand::thread_rng();
            match &workflow {
                Some(w) if !roster.is_empty() => (
                    telemetry::simulate_agents(&roster, &mut rng),
                    format!("Workflow '{}' executed successfully", w.name),
                ),
                _ => {
                    let runs = telemetry::simulate_sample(&mut rng);
                    let message = format!("Logged {} agent executions to metrics", runs.len());
                    (runs, message)
                }
            }
        };

        let mut logs = Vec::with_capacity(runs.len());
        for run in runs {
            logs.push(execution_logs::Entity::insert_one(log_row(user_id, workflow_id, run)).await?);
        }

        tracing::info!(user_id = %user_id, executions = logs.len(), "Simulated workflow run logged");

        Ok(RunSummary {
            message,
            executions_logged: logs.len(),
            logs,
        })
    }
}

fn log_row(user_id: Uuid, workflow_id: Option<Uuid>, run: SimulatedRun) -> execution_logs::ActiveModel {
    execution_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        workflow_id: Set(workflow_id),
        agent_id: Set(run.agent_id),
        agent_role: Set(Some(run.agent_role)),
        latency_ms: Set(run.latency_ms),
        success: Set(run.success),
        cost_usd: Set(run.cost_usd),
        error_message: Set(run.error_message),
        executed_at: Set(Utc::now()),
    }
}
