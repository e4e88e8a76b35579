use kit::{async_trait, Config, HttpResponse, Middleware, Next, Request, Response};

use crate::config::CorsConfig;

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Authorization, Content-Type, Accept, Origin";

/// CORS headers on every response; preflight requests stop here
pub struct Cors {
    config: CorsConfig,
}

impl Cors {
    pub fn new(config: CorsConfig) -> Self {
        Self { config }
    }

    pub fn from_config() -> Self {
        Self::new(Config::get_or(CorsConfig::from_env))
    }

    fn decorate(&self, response: HttpResponse, origin: Option<&str>) -> HttpResponse {
        let Some(allowed) = self.config.allow_origin(origin) else {
            return response;
        };

        let mut response = response
            .header("Access-Control-Allow-Origin", allowed)
            .header("Vary", "Origin");
        if self.config.allow_credentials {
            response = response.header("Access-Control-Allow-Credentials", "true");
        }
        response
    }
}

#[async_trait]
impl Middleware for Cors {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let origin = request.header("origin").map(str::to_string);

        if request.method().as_str() == "OPTIONS" {
            let preflight = HttpResponse::no_content()
                .header("Access-Control-Allow-Methods", ALLOW_METHODS)
                .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
                .header("Access-Control-Max-Age", self.config.max_age_secs.to_string());
            return Ok(self.decorate(preflight, origin.as_deref()));
        }

        match next(request).await {
            Ok(response) => Ok(self.decorate(response, origin.as_deref())),
            Err(response) => Err(self.decorate(response, origin.as_deref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit::testing::TestClient;
    use kit::{expect, get, json_response, MiddlewareRegistry, Router};

    async fn ping(_request: Request) -> Response {
        json_response!({ "ok": true })
    }

    fn client(origins: &str) -> TestClient {
        let cors = Cors::new(CorsConfig {
            allowed_origins: origins.to_string(),
            allow_credentials: true,
            max_age_secs: 600,
        });
        let router = get!("/ping", ping).register(Router::new());
        TestClient::with_registry(router, MiddlewareRegistry::new().append(cors))
    }

    #[tokio::test]
    async fn test_headers_on_normal_response() {
        let response = client("*")
            .get("/ping")
            .header("Origin", "http://localhost:5173")
            .send()
            .await;

        expect!(response.status()).to_equal(200);
        expect!(response.header("access-control-allow-origin")).to_equal(Some("http://localhost:5173"));
        expect!(response.header("access-control-allow-credentials")).to_equal(Some("true"));
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let response = client("http://a.io")
            .request("OPTIONS", "/ping")
            .header("Origin", "http://a.io")
            .send()
            .await;

        expect!(response.status()).to_equal(204);
        expect!(response.header("access-control-allow-methods")).to_equal(Some(ALLOW_METHODS));
        expect!(response.header("access-control-max-age")).to_equal(Some("600"));
    }

    #[tokio::test]
    async fn test_unlisted_origin_gets_no_headers() {
        let response = client("http://a.io")
            .get("/ping")
            .header("Origin", "http://evil.io")
            .send()
            .await;

        expect!(response.header("access-control-allow-origin")).to_equal(None);
    }
}
