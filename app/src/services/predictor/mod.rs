//! Completion-time and success-probability prediction
//!
//! Two paths share one output shape. When the three tree ensembles load from
//! `ML_MODEL_DIR` they drive both predictions; otherwise a weighted heuristic
//! does, optionally asking the language model for a complexity score.

pub mod ensemble;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::config::MlConfig;
use crate::services::llm::{ChatRequest, LanguageModel};
use crate::services::round_to;
use ensemble::{TrainedModels, FEATURE_COUNT, FEATURE_NAMES};

pub const HEURISTIC_MODEL: &str = "Heuristic (fallback)";
pub const ENSEMBLE_MODEL: &str = "RandomForest + GradientBoosting Ensemble";
pub const CLASSIFIER_MODEL: &str = "RandomForest Classifier";

const MIN_HOURS: f64 = 0.5;

const COMPLEXITY_KEYWORDS: [&str; 5] = ["complex", "multiple", "integration", "advanced", "critical"];
const FEATURE_KEYWORDS: [&str; 10] = [
    "complex",
    "multiple",
    "integration",
    "advanced",
    "critical",
    "extract",
    "validate",
    "monitor",
    "real-time",
    "security",
];

const ANALYST_PROMPT: &str =
    "You are an expert workflow analyst. Provide concise, actionable insights in JSON format.";
const OPTIMIZER_PROMPT: &str =
    "You are a workflow optimization expert. Provide specific, actionable advice in JSON format.";

const GENERAL_RECOMMENDATIONS: [&str; 3] = [
    "Add checkpoints for incremental validation",
    "Consider parallel agent execution",
    "Implement automated error recovery",
];

/// Everything the predict endpoint accepts, defaults already applied
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub description: String,
    pub agent_count: u32,
    pub step_count: u32,
    pub historical_avg_time: f64,
    pub confidence_scores: Vec<f64>,
    pub workflow_age_days: u32,
    pub agent_performance_avg: f64,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            description: String::new(),
            agent_count: 1,
            step_count: 5,
            historical_avg_time: 2.0,
            confidence_scores: vec![0.8],
            workflow_age_days: 30,
            agent_performance_avg: 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimePrediction {
    pub predicted_hours: f64,
    pub confidence: f64,
    pub range: TimeRange,
    pub factors: Map<String, Value>,
    pub model_type: &'static str,
    pub ai_insights: Option<AiInsights>,
}

/// The language model's reading of the description, heuristic path only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiInsights {
    pub complexity_level: String,
    pub key_challenges: Vec<String>,
    pub gpt_recommendation: String,
}

#[derive(Debug, Deserialize)]
struct ComplexityReply {
    complexity_score: f64,
    #[serde(default)]
    complexity_level: String,
    #[serde(default)]
    key_challenges: Vec<String>,
    #[serde(default)]
    recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub factor: &'static str,
    pub impact: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessPrediction {
    pub success_probability: f64,
    pub risk_level: &'static str,
    pub confidence: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub contributing_factors: Map<String, Value>,
    pub model_type: &'static str,
}

/// Body of `POST /api/v1/ml/predict`
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub predicted_hours: f64,
    pub success_probability: f64,
    pub confidence: f64,
    pub risk_level: &'static str,
    pub time_range: TimeRange,
    pub factors: Map<String, Value>,
    pub risk_factors: Vec<RiskFactor>,
    pub ai_recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<AiInsights>,
    pub timestamp: String,
}

/// Shared across requests; cloning is cheap
#[derive(Clone, Default)]
pub struct Predictor {
    models: Option<Arc<TrainedModels>>,
}

impl Predictor {
    pub fn heuristic() -> Self {
        Self { models: None }
    }

    pub fn trained(models: TrainedModels) -> Self {
        Self {
            models: Some(Arc::new(models)),
        }
    }

    /// Load the ensembles, staying on the heuristic path if anything is wrong
    pub fn from_config(config: &MlConfig) -> Self {
        match TrainedModels::load(&config.model_dir) {
            Ok(models) => {
                tracing::info!(
                    dir = %config.model_dir.display(),
                    trees = models.total_trees(),
                    "Trained models loaded"
                );
                Self::trained(models)
            }
            Err(e) => {
                tracing::warn!(error = %e, "No usable trained models, using heuristic predictions");
                Self::heuristic()
            }
        }
    }

    pub fn models(&self) -> Option<&TrainedModels> {
        self.models.as_deref()
    }

    pub fn is_trained(&self) -> bool {
        self.models.is_some()
    }

    /// Both predictions merged into the endpoint's response
    pub async fn predict(&self, input: &PredictionInput, llm: Option<&dyn LanguageModel>) -> Prediction {
        let time = self.predict_time(input, llm).await;
        let success = self.predict_success(input);

        let ai_recommendations = match llm {
            Some(llm) => smart_recommendations(llm, input, &time, &success).await,
            None => rule_based_recommendations(&success.risk_factors),
        };

        let mut factors = time.factors;
        factors.extend(success.contributing_factors);

        Prediction {
            predicted_hours: time.predicted_hours,
            success_probability: success.success_probability,
            confidence: time.confidence,
            risk_level: success.risk_level,
            time_range: time.range,
            factors,
            risk_factors: success.risk_factors,
            ai_recommendations,
            ai_insights: time.ai_insights,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub async fn predict_time(&self, input: &PredictionInput, llm: Option<&dyn LanguageModel>) -> TimePrediction {
        let hist = input.historical_avg_time;
        let agents = input.agent_count as f64;

        let Some(models) = self.models() else {
            let (complexity, ai_insights) = match llm {
                Some(llm) => llm_complexity(llm, &input.description, input.step_count).await,
                None => (heuristic_complexity(&input.description, input.step_count), None),
            };

            let complexity_weight = complexity * 10.0;
            let agent_weight = agents * 0.5;
            let hours = 0.45 * complexity_weight
                + 0.25 * agent_weight
                + 0.20 * hist
                + 0.10 * (input.step_count as f64 * 0.3);
            let hours = hours.max(MIN_HOURS);

            return TimePrediction {
                predicted_hours: round_to(hours, 2),
                confidence: round_to(0.75 + hist.min(10.0) / 40.0, 3),
                range: range(hours, 0.15),
                factors: factors(complexity_weight, -agent_weight * 0.3, hist),
                model_type: HEURISTIC_MODEL,
                ai_insights,
            };
        };

        let x = features(&input.description, input.agent_count, input.step_count, hist, 0.8, 30, 0.85);
        let hours = (0.6 * models.time_rf.predict(&x) + 0.4 * models.time_gb.predict(&x)).max(MIN_HOURS);

        TimePrediction {
            predicted_hours: round_to(hours, 2),
            confidence: round_to((0.82 + hist.min(10.0) / 50.0).min(0.95), 3),
            range: range(hours, 0.12),
            factors: factors(
                models.time_rf.importance_of("complexity_keywords") * 10.0,
                -models.time_rf.importance_of("agent_count") * agents * 0.3,
                hist,
            ),
            model_type: ENSEMBLE_MODEL,
            ai_insights: None,
        }
    }

    /// Success probability, clamped to `[0.1, 0.99]`
    ///
    /// The success side never sees the caller's agent count or history; it
    /// always assumes two agents and a two-hour baseline.
    pub fn predict_success(&self, input: &PredictionInput) -> SuccessPrediction {
        let avg_confidence = if input.confidence_scores.is_empty() {
            0.8
        } else {
            input.confidence_scores.iter().sum::<f64>() / input.confidence_scores.len() as f64
        };
        let maturity = (input.workflow_age_days as f64 / 90.0).min(1.0);
        let performance = input.agent_performance_avg;
        let complexity = heuristic_complexity(&input.description, input.step_count);

        let (probability, model_type) = match self.models() {
            Some(models) => {
                let x = features(
                    &input.description,
                    2,
                    input.step_count,
                    2.0,
                    avg_confidence,
                    input.workflow_age_days,
                    performance,
                );
                let proba = models.success_clf.predict_proba(&x);
                let p = proba.get(1).or_else(|| proba.first()).copied().unwrap_or(0.0);
                (p, CLASSIFIER_MODEL)
            }
            None => {
                let p = 0.40 * avg_confidence + 0.20 * maturity + 0.25 * performance + 0.15 * (1.0 - complexity);
                (p, HEURISTIC_MODEL)
            }
        };
        let probability = probability.clamp(0.1, 0.99);

        let mut risk_factors = Vec::new();
        if avg_confidence < 0.7 {
            risk_factors.push(RiskFactor {
                factor: "Low Agent Confidence",
                impact: "High",
                value: round_to(avg_confidence, 2),
            });
        }
        if complexity > 0.7 {
            risk_factors.push(RiskFactor {
                factor: "High Complexity",
                impact: "Medium",
                value: round_to(complexity, 2),
            });
        }
        if performance < 0.75 {
            risk_factors.push(RiskFactor {
                factor: "Low Agent Performance",
                impact: "High",
                value: round_to(performance, 2),
            });
        }

        let mut contributing_factors = Map::new();
        contributing_factors.insert("agent_confidence".into(), json!(round_to(avg_confidence, 2)));
        contributing_factors.insert("workflow_maturity".into(), json!(round_to(maturity, 2)));
        contributing_factors.insert("agent_performance".into(), json!(round_to(performance, 2)));

        SuccessPrediction {
            success_probability: round_to(probability, 3),
            risk_level: risk_level(probability),
            confidence: round_to(0.80 + maturity * 0.15, 3),
            risk_factors,
            contributing_factors,
            model_type,
        }
    }

    /// Time one prediction through the loaded models, in milliseconds
    pub fn benchmark_ms(&self) -> f64 {
        let Some(models) = self.models() else {
            return 0.0;
        };
        let x = features("benchmark workflow", 2, 5, 2.0, 0.8, 30, 0.85);
        let started = Instant::now();
        let _ = models.time_rf.predict(&x) + models.time_gb.predict(&x);
        let _ = models.success_clf.predict_proba(&x);
        round_to(started.elapsed().as_secs_f64() * 1000.0, 3)
    }

    /// Body of `GET /api/v1/ml/model-info`
    pub fn describe(&self) -> Value {
        let anomaly_detector = json!({
            "type": "Statistical (Z-Score + Rule-Based)",
            "method": "Standard Deviation Analysis",
            "sensitivity": "2 standard deviations",
            "status": "active",
        });

        let Some(models) = self.models() else {
            return json!({
                "models_loaded": false,
                "models": [{
                    "name": "Heuristic Model",
                    "type": "Weighted Scoring",
                    "status": "active (fallback)",
                    "role": "Time & Success Prediction",
                }],
                "anomaly_detector": anomaly_detector,
            });
        };

        let importances = |e: &ensemble::Ensemble| -> Map<String, Value> {
            e.importances()
                .into_iter()
                .map(|(name, value)| (name.to_string(), json!(round_to(value, 4))))
                .collect()
        };
        let describe = |name: &str, role: &str, e: &ensemble::Ensemble| {
            json!({
                "name": name,
                "role": role,
                "n_estimators": e.trees.len(),
                "max_depth": e.max_depth,
                "n_features": e.n_features,
                "total_nodes": e.node_count(),
                "status": "active",
            })
        };

        let mut rf = describe("RandomForest Regressor", "Time Prediction (60% weight)", &models.time_rf);
        rf["feature_importances"] = Value::Object(importances(&models.time_rf));
        let gb = describe("GradientBoosting Regressor", "Time Prediction (40% weight)", &models.time_gb);
        let mut clf = describe("RandomForest Classifier", "Success Classification", &models.success_clf);
        clf["n_classes"] = json!(models.success_clf.n_classes());
        clf["feature_importances"] = Value::Object(importances(&models.success_clf));

        let total_nodes = models.total_nodes();

        json!({
            "models_loaded": true,
            "models": [rf, gb, clf],
            "benchmark": {
                "single_prediction_ms": self.benchmark_ms(),
                "model_memory_estimate_mb": round_to(total_nodes as f64 * 0.001, 1),
            },
            "architecture": {
                "input_features": FEATURE_COUNT,
                "feature_names": FEATURE_NAMES,
                "ensemble_type": "Stacked (RF 60% + GB 40%)",
                "total_trees": models.total_trees(),
                "total_decision_nodes": total_nodes,
                "outputs": ["predicted_hours", "success_probability"],
            },
            "anomaly_detector": anomaly_detector,
        })
    }
}

pub fn risk_level(probability: f64) -> &'static str {
    if probability >= 0.85 {
        "Low"
    } else if probability >= 0.70 {
        "Medium"
    } else {
        "High"
    }
}

fn word_count(description: &str) -> usize {
    description.split_whitespace().count()
}

fn keyword_hits(description: &str, keywords: &[&str]) -> usize {
    let lower = description.to_lowercase();
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

/// Keyword and length score in `[0, 1]`
pub fn heuristic_complexity(description: &str, steps: u32) -> f64 {
    let base = (word_count(description) as f64 / 50.0).min(1.0);
    let keywords = keyword_hits(description, &COMPLEXITY_KEYWORDS) as f64 * 0.1;
    let steps = (steps as f64 / 20.0).min(0.5);
    (base + keywords + steps).min(1.0)
}

/// Ask the model for a complexity score, falling back to a length estimate
async fn llm_complexity(llm: &dyn LanguageModel, description: &str, steps: u32) -> (f64, Option<AiInsights>) {
    let prompt = format!(
        "Analyze this workflow description and provide complexity assessment:\n\n\
         Workflow: \"{}\"\nNumber of steps: {}\n\n\
         Respond in JSON format:\n\
         {{\"complexity_score\": 0.0, \"complexity_level\": \"Simple|Moderate|Complex|Very Complex\", \
         \"key_challenges\": [\"...\"], \"recommendation\": \"...\"}}\n\
         complexity_score is between 0.0 and 1.0, where 1.0 is most complex.",
        description, steps
    );
    let request = ChatRequest::new(ANALYST_PROMPT, prompt).temperature(0.3).max_tokens(300);

    let reply = llm
        .complete_json(request)
        .await
        .map_err(|e| e.to_string())
        .and_then(|reply| serde_json::from_value::<ComplexityReply>(reply).map_err(|e| e.to_string()));

    match reply {
        Ok(reply) => (
            reply.complexity_score.clamp(0.0, 1.0),
            Some(AiInsights {
                complexity_level: reply.complexity_level,
                key_challenges: reply.key_challenges,
                gpt_recommendation: reply.recommendation,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Complexity analysis failed, using length estimate");
            ((word_count(description) as f64 / 100.0 + steps as f64 / 20.0).min(1.0), None)
        }
    }
}

/// Three improvement ideas from the model, or the rule-based list on failure
async fn smart_recommendations(
    llm: &dyn LanguageModel,
    input: &PredictionInput,
    time: &TimePrediction,
    success: &SuccessPrediction,
) -> Vec<String> {
    let prompt = format!(
        "Given this workflow analysis:\n\
         - Success Probability: {:.1}%\n\
         - Completion Time: {} hours\n\
         - Agent Count: {}\n\
         - Risk Level: {}\n\n\
         Provide 3 specific, actionable recommendations to improve this workflow. Be concise.\n\n\
         Respond in JSON format: {{\"recommendations\": [\"...\", \"...\", \"...\"]}}",
        success.success_probability * 100.0,
        time.predicted_hours,
        input.agent_count,
        success.risk_level,
    );
    let request = ChatRequest::new(OPTIMIZER_PROMPT, prompt).temperature(0.4).max_tokens(200);

    let reply = llm.complete_json(request).await.map_err(|e| e.to_string()).and_then(|reply| {
        let list: Vec<String> = reply["recommendations"]
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        if list.is_empty() {
            Err("reply has no recommendations".to_string())
        } else {
            Ok(list)
        }
    });

    reply.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Recommendation request failed, using rule-based advice");
        rule_based_recommendations(&success.risk_factors)
    })
}

/// One recommendation per risk factor; general advice when nothing stands out
pub fn rule_based_recommendations(risk_factors: &[RiskFactor]) -> Vec<String> {
    let advice: Vec<String> = risk_factors
        .iter()
        .filter_map(|risk| match risk.factor {
            "Low Agent Confidence" => Some("Retrain or replace low-confidence agents before scaling up"),
            "High Complexity" => Some("Break the workflow into smaller sub-workflows"),
            "Low Agent Performance" => Some("Review failed agent runs and add automated error recovery"),
            _ => None,
        })
        .map(str::to_string)
        .collect();

    if advice.is_empty() {
        GENERAL_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
    } else {
        advice
    }
}

fn features(
    description: &str,
    agents: u32,
    steps: u32,
    hist: f64,
    confidence: f64,
    age_days: u32,
    performance: f64,
) -> [f64; FEATURE_COUNT] {
    [
        word_count(description) as f64,
        keyword_hits(description, &FEATURE_KEYWORDS) as f64,
        agents as f64,
        steps as f64,
        hist,
        confidence,
        age_days as f64,
        performance,
    ]
}

fn range(hours: f64, spread: f64) -> TimeRange {
    let uncertainty = hours * spread;
    TimeRange {
        min: round_to((hours - uncertainty).max(MIN_HOURS), 2),
        max: round_to(hours + uncertainty, 2),
    }
}

fn factors(complexity_impact: f64, agent_impact: f64, historical_baseline: f64) -> Map<String, Value> {
    let mut factors = Map::new();
    factors.insert("complexity_impact".into(), json!(round_to(complexity_impact, 2)));
    factors.insert("agent_impact".into(), json!(round_to(agent_impact, 2)));
    factors.insert("historical_baseline".into(), json!(round_to(historical_baseline, 2)));
    factors
}

#[cfg(test)]
mod tests {
    use super::ensemble::fixtures::trained;
    use super::*;
    use crate::services::llm::fake::FakeModel;
    use kit::expect;

    fn input(description: &str) -> PredictionInput {
        PredictionInput {
            description: description.to_string(),
            ..PredictionInput::default()
        }
    }

    #[tokio::test]
    async fn test_heuristic_time_prediction() {
        // 4 words, no keywords, 5 steps: c = 0.08 + 0.25 = 0.33
        let prediction = Predictor::heuristic()
            .predict_time(&input("send the weekly report"), None)
            .await;

        // 0.45*3.3 + 0.25*0.5 + 0.2*2.0 + 0.1*1.5
        expect!(prediction.predicted_hours).to_equal(2.16);
        expect!(prediction.confidence).to_equal(0.8);
        expect!(prediction.model_type).to_equal(HEURISTIC_MODEL);
        expect!(prediction.factors["complexity_impact"].clone()).to_equal(json!(3.3));
        expect!(prediction.factors["agent_impact"].clone()).to_equal(json!(-0.15));
        expect!(prediction.range.max).to_be_greater_than(prediction.predicted_hours);
    }

    #[tokio::test]
    async fn test_predicted_hours_never_below_floor() {
        let tiny = PredictionInput {
            description: String::new(),
            agent_count: 1,
            step_count: 1,
            historical_avg_time: 0.0,
            ..PredictionInput::default()
        };

        let heuristic = Predictor::heuristic().predict(&tiny, None).await;
        expect!(heuristic.predicted_hours).to_be_greater_than_or_equal(0.5);
        expect!(heuristic.time_range.min).to_be_greater_than_or_equal(0.5);

        let trained = Predictor::trained(trained()).predict(&tiny, None).await;
        expect!(trained.predicted_hours).to_be_greater_than_or_equal(0.5);
    }

    #[tokio::test]
    async fn test_llm_complexity_and_fallback() {
        let llm = FakeModel::replying(r#"{"complexity_score": 1.0, "complexity_level": "Complex"}"#);
        let with_llm = Predictor::heuristic()
            .predict_time(&input("send the weekly report"), Some(&llm))
            .await;
        expect!(with_llm.factors["complexity_impact"].clone()).to_equal(json!(10.0));

        // Failure: 4/100 + 5/20
        let failing = FakeModel::failing();
        let fallback = Predictor::heuristic()
            .predict_time(&input("send the weekly report"), Some(&failing))
            .await;
        expect!(fallback.factors["complexity_impact"].clone()).to_equal(json!(2.9));
    }

    #[test]
    fn test_success_probability_bounds_and_risk() {
        let weak = PredictionInput {
            description: "complex multiple integration advanced critical ".repeat(12),
            step_count: 30,
            confidence_scores: vec![0.0],
            workflow_age_days: 0,
            agent_performance_avg: 0.0,
            ..PredictionInput::default()
        };
        let prediction = Predictor::heuristic().predict_success(&weak);

        expect!(prediction.success_probability).to_equal(0.1);
        expect!(prediction.risk_level).to_equal("High");
        let names: Vec<&str> = prediction.risk_factors.iter().map(|r| r.factor).collect();
        expect!(names).to_equal(vec![
            "Low Agent Confidence",
            "High Complexity",
            "Low Agent Performance",
        ]);

        let strong = PredictionInput {
            confidence_scores: vec![1.0, 1.0],
            workflow_age_days: 365,
            agent_performance_avg: 1.0,
            ..input("send")
        };
        let prediction = Predictor::heuristic().predict_success(&strong);
        expect!(prediction.success_probability).to_be_between(0.85, 0.99);
        expect!(prediction.risk_level).to_equal("Low");
        expect!(prediction.confidence).to_equal(0.95);
        expect!(prediction.risk_factors).to_be_empty();
    }

    #[tokio::test]
    async fn test_trained_path() {
        let predictor = Predictor::trained(trained());

        // 5 steps goes left in every stump: rf 2.0, gb 1.0 + 0.5*(0.5+0.5) = 1.5
        let prediction = predictor.predict(&input("validate invoices"), None).await;
        expect!(prediction.predicted_hours).to_equal(1.8);
        expect!(prediction.confidence).to_equal(0.86);
        // class 1 share of [10, 30]
        expect!(prediction.success_probability).to_equal(0.75);
        expect!(prediction.risk_level).to_equal("Medium");
        expect!(prediction.factors["complexity_impact"].clone()).to_equal(json!(2.0));
        expect!(prediction.factors.contains_key("workflow_maturity")).to_be_true();
    }

    fn ceiling_input() -> PredictionInput {
        PredictionInput {
            description: String::new(),
            step_count: 1,
            confidence_scores: vec![1.0, 1.0],
            workflow_age_days: 365,
            agent_performance_avg: 1.0,
            ..PredictionInput::default()
        }
    }

    #[test]
    fn test_success_probability_capped_at_ceiling() {
        // 0.40 + 0.20 + 0.25 + 0.15 * (1 - 0.05) is above the cap
        let prediction = Predictor::heuristic().predict_success(&ceiling_input());
        expect!(prediction.success_probability).to_equal(0.99);
        expect!(prediction.risk_level).to_equal("Low");
    }

    #[tokio::test]
    async fn test_recommendations_from_model() {
        let llm = FakeModel::replying(
            r#"{"complexity_score": 0.4, "complexity_level": "Moderate",
                "key_challenges": ["manual hand-offs"], "recommendation": "Automate approvals",
                "recommendations": ["Batch the invoices", "Cache vendor lookups", "Alert on stalls"]}"#,
        );
        let prediction = Predictor::heuristic()
            .predict(&input("approve vendor invoices"), Some(&llm))
            .await;

        expect!(prediction.ai_recommendations).to_equal(vec![
            "Batch the invoices".to_string(),
            "Cache vendor lookups".to_string(),
            "Alert on stalls".to_string(),
        ]);
        expect!(prediction.ai_insights).to_equal(Some(AiInsights {
            complexity_level: "Moderate".to_string(),
            key_challenges: vec!["manual hand-offs".to_string()],
            gpt_recommendation: "Automate approvals".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_recommendations_fall_back_to_rules() {
        let weak = PredictionInput {
            confidence_scores: vec![0.5],
            agent_performance_avg: 0.6,
            ..input("send the weekly report")
        };

        let failing = FakeModel::failing();
        let prediction = Predictor::heuristic().predict(&weak, Some(&failing)).await;
        expect!(prediction.ai_insights).to_be_none();
        expect!(prediction.ai_recommendations.clone()).to_equal(vec![
            "Retrain or replace low-confidence agents before scaling up".to_string(),
            "Review failed agent runs and add automated error recovery".to_string(),
        ]);

        // A reply without a list is no better than a failure
        let vague = FakeModel::replying(r#"{"complexity_score": 0.2}"#);
        let prediction = Predictor::heuristic().predict(&weak, Some(&vague)).await;
        expect!(prediction.ai_recommendations).to_have_length(2);
        expect!(prediction.ai_insights.is_some()).to_be_true();

        let offline = Predictor::heuristic().predict(&input("send the weekly report"), None).await;
        expect!(offline.ai_recommendations).to_equal(
            GENERAL_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        );
        expect!(offline.ai_insights).to_be_none();
    }

    #[test]
    fn test_describe_reports_active_path() {
        let heuristic = Predictor::heuristic().describe();
        expect!(heuristic["models"][0]["name"].clone()).to_equal(json!("Heuristic Model"));
        expect!(heuristic["anomaly_detector"]["sensitivity"].clone()).to_equal(json!("2 standard deviations"));

        let trained = Predictor::trained(trained()).describe();
        expect!(trained["models"].as_array().map(Vec::len)).to_equal(Some(3));
        expect!(trained["architecture"]["total_trees"].clone()).to_equal(json!(6));
        expect!(trained["models"][2]["n_classes"].clone()).to_equal(json!(2));
        expect!(trained["models"][2]["feature_importances"].is_object()).to_be_true();
        expect!(trained["models"][0]["feature_importances"].is_object()).to_be_true();
    }
}
