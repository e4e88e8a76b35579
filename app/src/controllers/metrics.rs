use kit::{handler, App, AuthUser, HttpResponse, Query, Request, Response};

use crate::actions::{RunWorkflowAction, TelemetryAction, UserMetricsAction};
use crate::requests::TelemetryQuery;

#[handler]
pub async fn summary(user: AuthUser) -> Response {
    let summary = App::resolve::<UserMetricsAction>()?.execute(user.id).await;
    Ok(HttpResponse::json(summary))
}

#[handler]
pub async fn telemetry(user: AuthUser, Query(query): Query<TelemetryQuery>) -> Response {
    let report = App::resolve::<TelemetryAction>()?
        .execute(user.id, query.range)
        .await?;
    Ok(HttpResponse::serialize(&report)?)
}

#[handler]
pub async fn run_workflow(user: AuthUser, req: Request) -> Response {
    let summary = App::resolve::<RunWorkflowAction>()?
        .execute(user.id, req.param("id")?)
        .await?;
    Ok(HttpResponse::serialize(&summary)?)
}

#[cfg(test)]
mod tests {
    use crate::testing::TestApp;
    use kit::expect;
    use serde_json::{json, Value};

    async fn create(app: &TestApp, token: &str, body: Value) -> String {
        let response = app.client.post("/api/v1/workflows").bearer(token).json(&body).send().await;
        response.json()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let empty = app.client.get("/api/v1/metrics").bearer(&token).send().await;
        expect!(empty.json()).to_equal(json!({ "totalWorkflows": 0, "activeAgents": 0, "avgAutomation": 0 }));

        create(
            &app,
            &token,
            json!({
                "name": "A",
                "agents": [{ "status": "Active" }, { "status": "Deploying" }, { "status": "Idle" }],
                "metrics": { "automation_rate": 75 },
            }),
        )
        .await;
        create(&app, &token, json!({ "name": "B" })).await;

        let summary = app.client.get("/api/v1/metrics").bearer(&token).send().await;
        expect!(summary.json()).to_equal(json!({ "totalWorkflows": 2, "activeAgents": 2, "avgAutomation": 37 }));
    }

    #[tokio::test]
    async fn test_telemetry_without_workflows_is_empty() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let response = app.client.get("/api/v1/metrics/telemetry?range=30d").bearer(&token).send().await;
        let body = response.json();
        expect!(response.status()).to_equal(200);
        expect!(body["timeRange"].clone()).to_equal(json!("30d"));
        expect!(body["executionVolume"].clone()).to_equal(json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
        expect!(body["totalCost"].clone()).to_equal(json!(0));
    }

    #[tokio::test]
    async fn test_telemetry_rejects_unknown_range() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let response = app.client.get("/api/v1/metrics/telemetry?range=1y").bearer(&token).send().await;
        expect!(response.status()).to_equal(422);
    }

    #[tokio::test]
    async fn test_run_workflow_feeds_telemetry() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;
        let id = create(
            &app,
            &token,
            json!({ "name": "Intake", "agents": [{ "role": "Reader" }, { "role": "Writer" }] }),
        )
        .await;

        let run = app
            .client
            .post(&format!("/api/v1/metrics/run-workflow/{}", id))
            .bearer(&token)
            .send()
            .await
            .json();
        expect!(run["message"].clone()).to_equal(json!("Workflow 'Intake' executed successfully"));
        expect!(run["executions_logged"].clone()).to_equal(json!(2));
        for log in run["logs"].as_array().unwrap() {
            let latency = log["latency_ms"].as_i64().unwrap();
            expect!(latency).to_be_between(50, 500);
            expect!(log["workflow_id"].clone()).to_equal(json!(id));
        }

        let telemetry = app.client.get("/api/v1/metrics/telemetry?range=24h").bearer(&token).send().await.json();
        expect!(telemetry["totalExecutions"].clone()).to_equal(json!(2));
    }

    #[tokio::test]
    async fn test_run_unknown_workflow_logs_samples() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let run = app
            .client
            .post("/api/v1/metrics/run-workflow/demo")
            .bearer(&token)
            .send()
            .await
            .json();
        let logged = run["executions_logged"].as_u64().unwrap();
        expect!(logged).to_be_between(3, 5);
        expect!(run["message"].clone()).to_equal(json!(format!("Logged {} agent executions to metrics", logged)));
        expect!(run["logs"][0]["workflow_id"].clone()).to_equal(Value::Null);
    }
}
