//! Prediction, anomaly detection and model introspection
//!
//! These endpoints are public, like the rest of the ML surface.

use chrono::Utc;
use kit::{handler, json_response, App, HttpResponse, Response};
use serde_json::Value;
use std::time::Instant;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::requests::{AnomalyRequest, PredictRequest};
use crate::services::anomaly;
use crate::services::llm::LanguageModel;
use crate::services::predictor::{Predictor, ENSEMBLE_MODEL, HEURISTIC_MODEL};
use crate::services::round_to;

#[handler]
pub async fn predict(form: PredictRequest) -> Response {
    let predictor = App::resolve::<Predictor>()?;
    let llm = App::make::<dyn LanguageModel>();

    let prediction = predictor.predict(&form.into_input(), llm.as_deref()).await;
    Ok(HttpResponse::serialize(&prediction)?)
}

#[handler]
pub async fn detect_anomalies(form: AnomalyRequest) -> Response {
    let report = anomaly::detect(&form.observation());
    if report.is_anomaly {
        tracing::info!(
            workflow_id = form.workflow_id.as_deref().unwrap_or("-"),
            score = report.anomaly_score,
            "Anomalous run detected"
        );
    }
    Ok(HttpResponse::serialize(&report)?)
}

#[handler]
pub async fn health() -> Response {
    let started = Instant::now();
    let loaded = App::get::<Predictor>().is_some_and(|p| p.is_trained());
    let memory_mb = resident_memory_mb().unwrap_or(0.0);
    let latency_ms = round_to(started.elapsed().as_secs_f64() * 1000.0, 1);

    json_response!({
        "status": if loaded { "healthy" } else { "degraded" },
        "models_loaded": loaded,
        "model_type": if loaded { ENSEMBLE_MODEL } else { HEURISTIC_MODEL },
        "predictive_model": if loaded { "active (ensemble)" } else { "active (heuristic)" },
        "anomaly_detector": "active",
        "system_metrics": {
            "api_latency_ms": latency_ms,
            "memory_usage_mb": round_to(memory_mb, 1),
            "memory_percent": round_to(memory_mb / 1024.0 * 100.0, 1),
            "model_load_percent": if loaded { 100 } else { 0 },
        },
        "timestamp": Utc::now().to_rfc3339(),
    })
}

#[handler]
pub async fn model_info() -> Response {
    let predictor = App::get::<Predictor>().unwrap_or_default();
    let mut info = predictor.describe();
    if let Value::Object(map) = &mut info {
        map.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
    }
    Ok(HttpResponse::json(info))
}

/// Resident set size of this process
fn resident_memory_mb() -> Option<f64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        ProcessRefreshKind::new().with_memory(),
    );
    system
        .process(pid)
        .map(|process| process.memory() as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use crate::testing::TestApp;
    use kit::expect;
    use serde_json::json;

    #[tokio::test]
    async fn test_predict_uses_defaults() {
        let app = TestApp::new().await;
        let response = app
            .client
            .post("/api/v1/ml/predict")
            .json(&json!({ "description": "Send the weekly report" }))
            .send()
            .await;

        expect!(response.status()).to_equal(200);
        let body = response.json();
        expect!(body["predicted_hours"].as_f64().unwrap()).to_be_greater_than_or_equal(0.5);
        expect!(body["success_probability"].as_f64().unwrap()).to_be_between(0.0, 1.0);
        expect!(body["risk_factors"].is_array()).to_be_true();
    }

    #[tokio::test]
    async fn test_predict_caps_success_probability() {
        let app = TestApp::new().await;
        let response = app
            .client
            .post("/api/v1/ml/predict")
            .json(&json!({
                "description": "",
                "step_count": 1,
                "confidence_scores": [1.0, 1.0],
                "workflow_age_days": 365,
                "agent_performance_avg": 1.0,
            }))
            .send()
            .await;

        expect!(response.status()).to_equal(200);
        let body = response.json();
        expect!(body["success_probability"].clone()).to_equal(json!(0.99));
        expect!(body["risk_level"].clone()).to_equal(json!("Low"));
        expect!(body["ai_recommendations"].as_array().map(Vec::len)).to_equal(Some(3));
        expect!(body.get("ai_insights").is_none()).to_be_true();
    }

    #[tokio::test]
    async fn test_predict_validates_ranges() {
        let app = TestApp::new().await;
        let response = app
            .client
            .post("/api/v1/ml/predict")
            .json(&json!({ "description": "x", "agent_count": 0 }))
            .send()
            .await;
        expect!(response.status()).to_equal(422);
    }

    #[tokio::test]
    async fn test_detect_anomalies() {
        let app = TestApp::new().await;

        let calm = app
            .client
            .post("/api/v1/ml/detect-anomalies")
            .json(&json!({ "completion_time": 2.3, "agent_count": 3 }))
            .send()
            .await
            .json();
        expect!(calm["is_anomaly"].clone()).to_equal(json!(false));
        expect!(calm["recommendation"].clone()).to_equal(json!(null));

        let failing = app
            .client
            .post("/api/v1/ml/detect-anomalies")
            .json(&json!({ "completion_time": 2.3, "agent_count": 3, "success_rate": 0.5, "error_count": 9 }))
            .send()
            .await
            .json();
        expect!(failing["is_anomaly"].clone()).to_equal(json!(true));
    }

    #[tokio::test]
    async fn test_health_and_model_info_on_heuristics() {
        let app = TestApp::new().await;

        let health = app.client.get("/api/v1/ml/health").send().await.json();
        expect!(health["status"].clone()).to_equal(json!("degraded"));
        expect!(health["system_metrics"]["model_load_percent"].clone()).to_equal(json!(0));

        let info = app.client.get("/api/v1/ml/model-info").send().await.json();
        expect!(info["models_loaded"].clone()).to_equal(json!(false));
        expect!(info["models"][0]["name"].clone()).to_equal(json!("Heuristic Model"));
        expect!(info["timestamp"].is_string()).to_be_true();
    }
}
