use kit::request;
use serde::Deserialize;

use crate::services::anomaly::Observation;
use crate::services::predictor::PredictionInput;
use crate::services::telemetry::TimeWindow;

#[request]
pub struct PredictRequest {
    pub description: String,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub agent_count: u32,
    #[serde(default = "five")]
    #[validate(range(min = 1))]
    pub step_count: u32,
    #[serde(default = "two_hours")]
    #[validate(range(min = 0.0))]
    pub historical_avg_time: f64,
    #[serde(default)]
    pub confidence_scores: Option<Vec<f64>>,
    #[serde(default = "thirty_days")]
    pub workflow_age_days: u32,
    #[serde(default = "default_performance")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub agent_performance_avg: f64,
}

impl PredictRequest {
    pub fn into_input(self) -> PredictionInput {
        PredictionInput {
            description: self.description,
            agent_count: self.agent_count,
            step_count: self.step_count,
            historical_avg_time: self.historical_avg_time,
            confidence_scores: self.confidence_scores.unwrap_or_else(|| vec![0.8]),
            workflow_age_days: self.workflow_age_days,
            agent_performance_avg: self.agent_performance_avg,
        }
    }
}

#[request]
pub struct AnomalyRequest {
    pub completion_time: f64,
    pub agent_count: u32,
    #[serde(default = "full_rate")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub success_rate: f64,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub workflow_id: Option<String>,
}

impl AnomalyRequest {
    pub fn observation(&self) -> Observation {
        Observation {
            completion_time: self.completion_time,
            agent_count: self.agent_count,
            success_rate: self.success_rate,
            error_count: self.error_count,
        }
    }
}

/// `?range=24h|7d|30d|90d`; anything else is a 422
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryQuery {
    #[serde(default)]
    pub range: TimeWindow,
}

fn one() -> u32 {
    1
}

fn five() -> u32 {
    5
}

fn two_hours() -> f64 {
    2.0
}

fn thirty_days() -> u32 {
    30
}

fn default_performance() -> f64 {
    0.85
}

fn full_rate() -> f64 {
    1.0
}
