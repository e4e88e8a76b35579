//! Bearer-token authentication for `/api/v1` resources

use kit::auth::bearer_token;
use kit::{async_trait, AuthConfig, AuthUser, Config, HttpResponse, Middleware, Next, Request, Response};
use serde_json::json;

/// Resolves the caller from `Authorization: Bearer <token>`
///
/// A missing header is 403; a token that fails verification is 401. On
/// success the [`AuthUser`] is stored on the request for handlers to extract.
pub struct Authenticate;

#[async_trait]
impl Middleware for Authenticate {
    async fn handle(&self, mut request: Request, next: Next) -> Response {
        let Some(token) = bearer_token(&request) else {
            return Err(HttpResponse::json(json!({ "detail": "Not authenticated" })).status(403));
        };

        let config = Config::get_or(AuthConfig::from_env);
        let user = AuthUser::from_token(&config, token)?;
        request.insert_extension(user);

        next(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit::auth::issue_token;
    use kit::testing::TestClient;
    use kit::{expect, get, group, json_response, routes};

    async fn whoami(request: Request) -> Response {
        let user = request
            .extension::<AuthUser>()
            .cloned()
            .ok_or_else(|| HttpResponse::text("no user").status(500))?;
        json_response!({ "id": user.id, "email": user.email })
    }

    routes! {
        group!("/api/v1", { get!("/me", whoami) }).middleware(Authenticate),
    }

    #[tokio::test]
    async fn test_missing_header_is_forbidden() {
        let client = TestClient::new(register());
        let response = client.get("/api/v1/me").send().await;

        expect!(response.status()).to_equal(403);
        expect!(response.json()).to_equal(json!({ "detail": "Not authenticated" }));
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let client = TestClient::new(register());
        let response = client.get("/api/v1/me").bearer("not-a-jwt").send().await;

        expect!(response.status()).to_equal(401);
        expect!(response.json()).to_equal(json!({ "detail": "Could not validate credentials" }));
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let config = Config::get_or(AuthConfig::from_env);
        let id = uuid::Uuid::new_v4();
        let token = issue_token(&config, &id.to_string(), "ada@example.com").unwrap();

        let client = TestClient::new(register());
        let response = client.get("/api/v1/me").bearer(&token).send().await;

        expect!(response.status()).to_equal(200);
        expect!(response.json()).to_equal(json!({ "id": id, "email": "ada@example.com" }));
    }
}
