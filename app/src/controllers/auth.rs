use kit::{handler, json_response, App, AuthUser, HttpResponse, Response};

use crate::actions::{LoginAction, SendOtpAction, SignupAction, VerifyOtpAction};
use crate::requests::{LoginRequest, SendOtpRequest, SignupRequest, VerifyOtpRequest};

#[handler]
pub async fn signup(form: SignupRequest) -> Response {
    let token = App::resolve::<SignupAction>()?.execute(form).await?;
    Ok(HttpResponse::serialize(&token)?.status(201))
}

#[handler]
pub async fn login(form: LoginRequest) -> Response {
    let token = App::resolve::<LoginAction>()?.execute(form).await?;
    Ok(HttpResponse::serialize(&token)?)
}

/// Tokens are stateless; the client discards its copy
#[handler]
pub async fn logout(_user: AuthUser) -> Response {
    json_response!({ "message": "Successfully logged out" })
}

#[handler]
pub async fn send_otp(form: SendOtpRequest) -> Response {
    let message = App::resolve::<SendOtpAction>()?.execute(&form.email).await?;
    json_response!({ "message": message })
}

#[handler]
pub async fn verify_otp(form: VerifyOtpRequest) -> Response {
    let token = App::resolve::<VerifyOtpAction>()?.execute(form).await?;
    Ok(HttpResponse::serialize(&token)?)
}

#[cfg(test)]
mod tests {
    use crate::models::users;
    use crate::testing::TestApp;
    use chrono::{Duration, Utc};
    use kit::database::ModelMut;
    use kit::expect;
    use sea_orm::Set;
    use serde_json::json;

    #[tokio::test]
    async fn test_signup_then_login() {
        let app = TestApp::new().await;
        app.token_for("ada@example.com").await;

        let response = app
            .client
            .post("/api/v1/auth/login")
            .json(&json!({ "email": "ada@example.com", "password": "correct-horse" }))
            .send()
            .await;

        expect!(response.status()).to_equal(200);
        expect!(response.json()["token_type"].clone()).to_equal(json!("bearer"));
    }

    #[tokio::test]
    async fn test_signup_rejections_in_order() {
        let app = TestApp::new().await;

        let invalid = app
            .client
            .post("/api/v1/auth/signup")
            .json(&json!({ "email": "not-an-email", "password": "x" }))
            .send()
            .await;
        expect!(invalid.status()).to_equal(422);

        app.token_for("ada@example.com").await;
        let duplicate = app
            .client
            .post("/api/v1/auth/signup")
            .json(&json!({ "email": "ada@example.com", "password": "x" }))
            .send()
            .await;
        expect!(duplicate.status()).to_equal(400);
        expect!(duplicate.json()).to_equal(json!({ "detail": "Email already registered" }));

        let short = app
            .client
            .post("/api/v1/auth/signup")
            .json(&json!({ "email": "bob@example.com", "password": "short" }))
            .send()
            .await;
        expect!(short.status()).to_equal(400);
        expect!(short.json()).to_equal(json!({ "detail": "Password must be at least 8 characters" }));
    }

    #[tokio::test]
    async fn test_login_failures_look_alike() {
        let app = TestApp::new().await;
        app.token_for("ada@example.com").await;

        for body in [
            json!({ "email": "ada@example.com", "password": "wrong-horse" }),
            json!({ "email": "nobody@example.com", "password": "correct-horse" }),
        ] {
            let response = app.client.post("/api/v1/auth/login").json(&body).send().await;
            expect!(response.status()).to_equal(401);
            expect!(response.json()).to_equal(json!({ "detail": "Invalid email or password" }));
        }
    }

    #[tokio::test]
    async fn test_logout_needs_token() {
        let app = TestApp::new().await;
        let token = app.token_for("ada@example.com").await;

        let anonymous = app.client.post("/api/v1/auth/logout").send().await;
        expect!(anonymous.status()).to_equal(403);

        let response = app.client.post("/api/v1/auth/logout").bearer(&token).send().await;
        expect!(response.json()).to_equal(json!({ "message": "Successfully logged out" }));
    }

    #[tokio::test]
    async fn test_otp_round_trip() {
        let app = TestApp::new().await;
        app.token_for("ada@example.com").await;

        let sent = app
            .client
            .post("/api/v1/auth/send-otp")
            .json(&json!({ "email": "ada@example.com" }))
            .send()
            .await;
        expect!(sent.status()).to_equal(200);

        let user = users::Model::find_by_email("ada@example.com").await.unwrap().unwrap();
        let code = user.otp_code.clone().unwrap();
        expect!(code.len()).to_equal(6);

        let wrong = app
            .client
            .post("/api/v1/auth/verify-otp")
            .json(&json!({ "email": "ada@example.com", "code": "not-it" }))
            .send()
            .await;
        expect!(wrong.json()).to_equal(json!({ "detail": "Invalid verification code" }));

        let verified = app
            .client
            .post("/api/v1/auth/verify-otp")
            .json(&json!({ "email": "ada@example.com", "code": code }))
            .send()
            .await;
        expect!(verified.status()).to_equal(200);

        let user = users::Model::find_by_email("ada@example.com").await.unwrap().unwrap();
        expect!(user.otp_code).to_equal(None);
    }

    #[tokio::test]
    async fn test_expired_otp() {
        let app = TestApp::new().await;
        app.token_for("ada@example.com").await;

        let user = users::Model::find_by_email("ada@example.com").await.unwrap().unwrap();
        let mut active: users::ActiveModel = user.into();
        active.otp_code = Set(Some("123456".to_string()));
        active.otp_expires_at = Set(Some(Utc::now() - Duration::minutes(1)));
        users::Entity::update_one(active).await.unwrap();

        let response = app
            .client
            .post("/api/v1/auth/verify-otp")
            .json(&json!({ "email": "ada@example.com", "code": "123456" }))
            .send()
            .await;
        expect!(response.status()).to_equal(400);
        expect!(response.json()).to_equal(json!({ "detail": "Verification code has expired" }));
    }

    #[tokio::test]
    async fn test_send_otp_unknown_user() {
        let app = TestApp::new().await;
        let response = app
            .client
            .post("/api/v1/auth/send-otp")
            .json(&json!({ "email": "ghost@example.com" }))
            .send()
            .await;
        expect!(response.status()).to_equal(404);
        expect!(response.json()).to_equal(json!({ "detail": "User not found" }));
    }
}
