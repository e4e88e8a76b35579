//! SeaORM persistence
//!
//! The pool lives in the service container as a [`DbConnection`] singleton.
//!
//! ```rust,ignore
//! Config::register(DatabaseConfig::from_env());
//! DB::init().await?;
//!
//! let conn = DB::connection()?;
//! let users = users::Entity::find().all(conn.inner()).await?;
//! ```

pub mod config;
pub mod connection;
pub mod model;
pub mod testing;

pub use config::{DatabaseConfig, DatabaseConfigBuilder, DatabaseType};
pub use connection::DbConnection;
pub use model::{Model, ModelMut};

use crate::error::FrameworkError;
use crate::{App, Config};

/// Database facade
pub struct DB;

impl DB {
    /// Connect using the registered `DatabaseConfig`, or one read from the environment
    pub async fn init() -> Result<(), FrameworkError> {
        let config = Config::get_or(DatabaseConfig::from_env);
        Self::init_with(config).await
    }

    pub async fn init_with(config: DatabaseConfig) -> Result<(), FrameworkError> {
        let connection = DbConnection::connect(&config).await?;
        App::singleton(connection);
        Ok(())
    }

    /// The shared pool; fails with a 500 before `init`
    pub fn connection() -> Result<DbConnection, FrameworkError> {
        App::resolve::<DbConnection>()
    }

    pub fn is_connected() -> bool {
        App::has::<DbConnection>()
    }
}

pub use sea_orm;
