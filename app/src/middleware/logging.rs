use kit::{async_trait, Middleware, Next, Request, Response};
use std::time::Instant;

/// One line per request with status and latency
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let method = request.method().to_string();
        let path = request.path().to_string();
        let started = Instant::now();

        let response = next(request).await;

        let status = match &response {
            Ok(r) | Err(r) => r.status_code(),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status >= 500 {
            tracing::error!(%method, %path, status, elapsed_ms, "request failed");
        } else {
            tracing::info!(%method, %path, status, elapsed_ms, "request");
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit::testing::TestClient;
    use kit::{expect, get, HttpResponse, MiddlewareRegistry, Router};

    async fn boom(_request: Request) -> Response {
        Err(HttpResponse::text("boom").status(500))
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let router = get!("/boom", boom).register(Router::new());
        let client = TestClient::with_registry(router, MiddlewareRegistry::new().append(RequestLogger));

        let response = client.get("/boom").send().await;
        expect!(response.status()).to_equal(500);
        expect!(response.text()).to_equal("boom");
    }
}
