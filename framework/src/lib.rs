//! Kit: the HTTP framework under Flowpilot
//!
//! Routing, middleware, request extraction, config, a service container,
//! SeaORM persistence, bearer auth and test helpers.

// Lets the proc macros emit `::kit::` paths from inside this crate too
extern crate self as kit;

pub mod app;
pub mod auth;
pub mod config;
pub mod container;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod testing;

pub use app::Application;
pub use auth::{AuthConfig, AuthUser};
pub use config::{env, env_optional, AppConfig, Config, Environment, ServerConfig};
pub use container::App;
pub use database::{DatabaseConfig, DbConnection, DB};
pub use error::{AppError, FrameworkError, HttpError, ValidationErrors};
pub use crate::http::{
    json, text, FormRequest, FromRequest, FromRequestParts, HttpResponse, Query, Request,
    Response, ResponseExt,
};
pub use middleware::{Middleware, MiddlewareRegistry, Next};
pub use routing::{
    GroupDef, GroupRoute, HttpMethod, RouteBuilder, RouteDefBuilder, Router, __route_impl,
    validate_route_path,
};
pub use server::{Dispatcher, Server};

// Used by macro expansions and by apps that should not pin their own versions
pub use async_trait::async_trait;
pub use inventory;
pub use serde;
pub use serde_json;
pub use tracing;
pub use validator;

pub use flowpilot_macros::{domain_error, handler, injectable, request, FormRequest};
