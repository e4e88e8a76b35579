//! In-process HTTP client
//!
//! Requests go through the real router, global middleware and route
//! middleware without opening a socket.
//!
//! ```rust,ignore
//! let client = TestClient::new(routes::register());
//! let response = client.post("/api/v1/auth/login").json(&body).send().await;
//! expect!(response.status()).to_equal(200);
//! ```

use bytes::Bytes;
use serde::Serialize;

use crate::http::{HttpResponse, Request};
use crate::middleware::MiddlewareRegistry;
use crate::routing::Router;
use crate::server::Dispatcher;

pub struct TestClient {
    dispatcher: Dispatcher,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self::with_registry(router, MiddlewareRegistry::new())
    }

    /// Run `middleware` as global middleware, in front of every request
    pub fn with_registry(router: Router, middleware: MiddlewareRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(router, middleware),
        }
    }

    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.request("GET", uri)
    }

    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        self.request("POST", uri)
    }

    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        self.request("PUT", uri)
    }

    pub fn patch(&self, uri: &str) -> TestRequest<'_> {
        self.request("PATCH", uri)
    }

    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.request("DELETE", uri)
    }

    pub fn request(&self, method: &str, uri: &str) -> TestRequest<'_> {
        TestRequest {
            client: self,
            builder: http::Request::builder().method(method).uri(uri),
            body: Bytes::new(),
        }
    }
}

pub struct TestRequest<'a> {
    client: &'a TestClient,
    builder: http::request::Builder,
    body: Bytes,
}

impl TestRequest<'_> {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_vec(body)
            .map(Bytes::from)
            .unwrap_or_else(|e| panic!("test body is not serializable: {}", e));
        self.header("Content-Type", "application/json")
    }

    pub fn body(mut self, content_type: &str, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.header("Content-Type", content_type)
    }

    pub async fn send(self) -> TestResponse {
        let request = self
            .builder
            .body(self.body)
            .unwrap_or_else(|e| panic!("invalid test request: {}", e));
        let response = self.client.dispatcher.dispatch(Request::from_bytes(request)).await;
        TestResponse { inner: response }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    inner: HttpResponse,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.inner.status_code()
    }

    pub fn text(&self) -> &str {
        self.inner.body()
    }

    /// Body parsed as JSON; `Null` when it is not JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.inner.body()).unwrap_or(serde_json::Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header_value(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    async fn echo(req: Request) -> Response {
        let body: serde_json::Value = req.json().await?;
        Ok(HttpResponse::json(body).status(201))
    }

    #[tokio::test]
    async fn test_post_json_roundtrip() {
        let client = TestClient::new(Router::new().post("/echo", echo).into());
        let response = client
            .post("/echo")
            .json(&serde_json::json!({ "name": "Invoices" }))
            .send()
            .await;

        assert_eq!(response.status(), 201);
        assert_eq!(response.json()["name"], "Invoices");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let client = TestClient::new(Router::new());
        let response = client.get("/nope").send().await;
        assert_eq!(response.status(), 404);
        assert_eq!(response.json()["detail"], "Not Found");
    }
}
