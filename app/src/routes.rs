use kit::{delete, get, group, patch, post, put, routes};

use crate::controllers;
use crate::middleware::Authenticate;

routes! {
    get!("/", controllers::root::index),

    group!("/api/v1/auth", {
        post!("/signup", controllers::auth::signup),
        post!("/login", controllers::auth::login),
        post!("/send-otp", controllers::auth::send_otp),
        post!("/verify-otp", controllers::auth::verify_otp),
    }),

    group!("/api/v1/auth", {
        post!("/logout", controllers::auth::logout),
    }).middleware(Authenticate),

    group!("/api/v1", {
        get!("/workflows", controllers::workflows::index),
        post!("/workflows", controllers::workflows::store),
        get!("/workflows/{id}", controllers::workflows::show),
        put!("/workflows/{id}", controllers::workflows::update),
        delete!("/workflows/{id}", controllers::workflows::destroy),
        post!("/workflows/{id}/agents", controllers::workflows::add_agent),
        patch!("/agents/{id}/deploy", controllers::agents::deploy),

        get!("/metrics", controllers::metrics::summary),
        get!("/metrics/telemetry", controllers::metrics::telemetry),
        post!("/metrics/run-workflow/{id}", controllers::metrics::run_workflow),

        post!("/analysis/analyze", controllers::analysis::analyze),
        get!("/analysis/workflows/{id}/insights", controllers::analysis::insights),
    }).middleware(Authenticate),

    group!("/api/v1/ml", {
        post!("/predict", controllers::ml::predict),
        post!("/detect-anomalies", controllers::ml::detect_anomalies),
        get!("/health", controllers::ml::health),
        get!("/model-info", controllers::ml::model_info),
    }),

    group!("/api/v1", {
        post!("/analyze", controllers::legacy::analyze),
        post!("/upload", controllers::legacy::upload),
    }),
}
