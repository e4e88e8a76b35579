//! Shared setup for endpoint tests

use kit::testing::{TestClient, TestContainer, TestDatabase};
use kit::App;
use serde_json::json;

use crate::migrations::Migrator;
use crate::routes;
use crate::services::predictor::Predictor;

/// Full router over a fresh in-memory database
pub struct TestApp {
    pub client: TestClient,
    _db: TestDatabase,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = TestDatabase::fresh::<Migrator>().await.expect("test database");
        App::boot_services();
        TestContainer::singleton(Predictor::heuristic());

        Self {
            client: TestClient::new(routes::register()),
            _db: db,
        }
    }

    /// Sign up and return a bearer token
    pub async fn token_for(&self, email: &str) -> String {
        let response = self
            .client
            .post("/api/v1/auth/signup")
            .json(&json!({ "email": email, "password": "correct-horse" }))
            .send()
            .await;
        assert_eq!(response.status(), 201, "signup failed: {}", response.text());
        response.json()["access_token"]
            .as_str()
            .expect("access_token")
            .to_string()
    }
}
