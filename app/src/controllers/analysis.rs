use chrono::Utc;
use kit::{handler, json_response, AuthUser, Request, Response};

use crate::requests::AnalyzeWorkflowRequest;
use crate::services::analyzer;

#[handler]
pub async fn analyze(_user: AuthUser, form: AnalyzeWorkflowRequest) -> Response {
    let steps = form.workflow_steps.unwrap_or_default();
    let analysis = analyzer::analyze(&form.workflow_description, &steps);

    json_response!({
        "workflow_id": form.workflow_id,
        "analysis": analysis,
        "generated_at": Utc::now().to_rfc3339(),
    })
}

#[handler]
pub async fn insights(_user: AuthUser, req: Request) -> Response {
    json_response!({
        "message": "Insights endpoint - coming soon",
        "workflow_id": req.param("id")?,
    })
}

#[cfg(test)]
mod tests {
    use crate::testing::TestApp;
    use kit::expect;
    use serde_json::json;

    #[tokio::test]
    async fn test_analyze_wraps_report() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let response = app
            .client
            .post("/api/v1/analysis/analyze")
            .bearer(&token)
            .json(&json!({
                "workflow_id": "wf-1",
                "workflow_description": "Manual approval then store the data",
                "workflow_steps": ["Receive", "Approve", "Store"],
            }))
            .send()
            .await;

        expect!(response.status()).to_equal(200);
        let body = response.json();
        expect!(body["workflow_id"].clone()).to_equal(json!("wf-1"));
        expect!(body["analysis"]["bottlenecks"]["hasBottlenecks"].clone()).to_equal(json!(true));
        expect!(body["generated_at"].is_string()).to_be_true();
    }

    #[tokio::test]
    async fn test_insights_placeholder() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let anonymous = app.client.get("/api/v1/analysis/workflows/7/insights").send().await;
        expect!(anonymous.status()).to_equal(403);

        let response = app
            .client
            .get("/api/v1/analysis/workflows/7/insights")
            .bearer(&token)
            .send()
            .await;
        expect!(response.json()).to_equal(json!({
            "message": "Insights endpoint - coming soon",
            "workflow_id": "7",
        }));
    }
}
