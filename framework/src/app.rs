//! Application entry point: CLI, config, bootstrap, migrations and serving
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> ExitCode {
//!     Application::new()
//!         .config(config::register_all)
//!         .bootstrap(bootstrap::register)
//!         .routes(routes::register)
//!         .migrations::<migrations::Migrator>()
//!         .run()
//!         .await
//! }
//! ```

use crate::database::{DatabaseConfig, DbConnection};
use crate::error::FrameworkError;
use crate::{logging, Config, Router, Server};
use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "flowpilot")]
#[command(about = "Flowpilot API server and database tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Skip running migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },
    /// Run pending database migrations
    Migrate,
    #[command(name = "migrate:status")]
    MigrateStatus,
    /// Roll back the last migration(s)
    #[command(name = "migrate:rollback")]
    MigrateRollback {
        #[arg(default_value = "1")]
        steps: u32,
    },
    /// Drop all tables and re-run all migrations
    #[command(name = "migrate:fresh")]
    MigrateFresh,
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type BootstrapFn =
    Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), FrameworkError>> + Send>> + Send>;
type RoutesFn = Box<dyn FnOnce() -> Router + Send>;

pub struct Application<M = NoMigrator>
where
    M: MigratorTrait,
{
    config_fn: Option<Box<dyn FnOnce()>>,
    bootstrap_fn: Option<BootstrapFn>,
    routes_fn: Option<RoutesFn>,
    _migrator: std::marker::PhantomData<M>,
}

/// Used until `.migrations::<M>()` is called
pub struct NoMigrator;

impl MigratorTrait for NoMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![]
    }
}

impl Application<NoMigrator> {
    pub fn new() -> Self {
        Application {
            config_fn: None,
            bootstrap_fn: None,
            routes_fn: None,
            _migrator: std::marker::PhantomData,
        }
    }
}

impl Default for Application<NoMigrator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Application<M>
where
    M: MigratorTrait,
{
    /// Register application config; runs right after `.env` loading
    pub fn config<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.config_fn = Some(Box::new(f));
        self
    }

    /// Register services and global middleware before serving
    pub fn bootstrap<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), FrameworkError>> + Send + 'static,
    {
        self.bootstrap_fn = Some(Box::new(move || Box::pin(f())));
        self
    }

    pub fn routes<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Router + Send + 'static,
    {
        self.routes_fn = Some(Box::new(f));
        self
    }

    pub fn migrations<NewM>(self) -> Application<NewM>
    where
        NewM: MigratorTrait,
    {
        Application {
            config_fn: self.config_fn,
            bootstrap_fn: self.bootstrap_fn,
            routes_fn: self.routes_fn,
            _migrator: std::marker::PhantomData,
        }
    }

    /// Parse the command line and run the chosen command
    ///
    /// Failures are logged and turned into a non-zero exit code.
    pub async fn run(self) -> ExitCode {
        let cli = Cli::parse();

        let environment = Config::init(Path::new("."));
        logging::init();
        tracing::debug!(%environment, "configuration loaded");

        let Application {
            config_fn,
            bootstrap_fn,
            routes_fn,
            _migrator,
        } = self;

        if let Some(config_fn) = config_fn {
            config_fn();
        }

        let result = match cli.command {
            None | Some(Commands::Serve { no_migrate: false }) => {
                match Self::migrate_up().await {
                    Ok(()) => Self::serve(bootstrap_fn, routes_fn).await,
                    Err(e) => Err(e),
                }
            }
            Some(Commands::Serve { no_migrate: true }) => Self::serve(bootstrap_fn, routes_fn).await,
            Some(Commands::Migrate) => Self::migrate_up().await,
            Some(Commands::MigrateStatus) => Self::migrate_status().await,
            Some(Commands::MigrateRollback { steps }) => Self::migrate_down(steps).await,
            Some(Commands::MigrateFresh) => Self::migrate_fresh().await,
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "flowpilot exited with an error");
                ExitCode::FAILURE
            }
        }
    }

    async fn serve(bootstrap_fn: Option<BootstrapFn>, routes_fn: Option<RoutesFn>) -> Result<(), BoxError> {
        if let Some(bootstrap_fn) = bootstrap_fn {
            bootstrap_fn().await?;
        }

        let router = routes_fn.map(|f| f()).unwrap_or_default();
        Server::from_config(router).run().await
    }

    async fn connect() -> Result<DbConnection, BoxError> {
        let config = Config::get_or(DatabaseConfig::from_env);
        Ok(DbConnection::connect(&config).await?)
    }

    async fn migrate_up() -> Result<(), BoxError> {
        let db = Self::connect().await?;
        M::up(db.inner(), None).await?;
        tracing::info!("migrations are up to date");
        Ok(())
    }

    async fn migrate_status() -> Result<(), BoxError> {
        let db = Self::connect().await?;
        M::status(db.inner()).await?;
        Ok(())
    }

    async fn migrate_down(steps: u32) -> Result<(), BoxError> {
        tracing::info!(steps, "rolling back migrations");
        let db = Self::connect().await?;
        M::down(db.inner(), Some(steps)).await?;
        Ok(())
    }

    async fn migrate_fresh() -> Result<(), BoxError> {
        tracing::warn!("dropping all tables and re-running migrations");
        let db = Self::connect().await?;
        M::fresh(db.inner()).await?;
        Ok(())
    }
}
