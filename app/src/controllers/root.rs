use kit::{handler, json_response, Response};

const FEATURES: [&str; 10] = [
    "Workflow Automation",
    "AI Agent Deployment",
    "Real-time Analytics",
    "AI-Powered Deep Analysis",
    "Predictive Analytics (ML)",
    "Anomaly Detection (ML)",
    "Time Series Forecasting",
    "NLP Workflow Analysis",
    "Success Probability Prediction",
    "Intelligent Recommendations",
];

#[handler]
pub async fn index() -> Response {
    json_response!({
        "message": format!("Flowpilot API v{}", env!("CARGO_PKG_VERSION")),
        "features": FEATURES,
    })
}

#[cfg(test)]
mod tests {
    use crate::testing::TestApp;
    use kit::expect;

    #[tokio::test]
    async fn test_root_lists_features() {
        let app = TestApp::new().await;
        let body = app.client.get("/").send().await.json();

        expect!(body["message"].as_str().unwrap().to_string()).to_contain("Flowpilot API");
        expect!(body["features"].as_array().unwrap().len()).to_equal(10);
    }
}
