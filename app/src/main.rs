use std::process::ExitCode;

use kit::Application;

mod actions;
mod bootstrap;
mod config;
mod controllers;
mod errors;
mod middleware;
mod migrations;
mod models;
mod requests;
mod routes;
mod services;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> ExitCode {
    Application::new()
        .config(config::register_all)
        .bootstrap(bootstrap::register)
        .routes(routes::register)
        .migrations::<migrations::Migrator>()
        .run()
        .await
}
