use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::{DatabaseConfig, DatabaseType};
use crate::error::FrameworkError;

/// Shared, clonable handle to the connection pool
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Open a pool for `config`
    ///
    /// File-backed SQLite URLs get their parent directory created and are
    /// opened in create mode.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FrameworkError> {
        let url = match config.database_type() {
            DatabaseType::Sqlite => sqlite_url(&config.url)?,
            DatabaseType::Postgres => config.url.clone(),
        };

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(config.logging);

        let conn = Database::connect(opt).await?;
        tracing::debug!(kind = ?config.database_type(), "database pool ready");

        Ok(Self {
            inner: Arc::new(conn),
        })
    }

    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }
}

fn sqlite_url(url: &str) -> Result<String, FrameworkError> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("./");

    if path.starts_with(":memory:") {
        return Ok("sqlite::memory:".to_string());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FrameworkError::database(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
    }

    Ok(format!("sqlite:{}?mode=rwc", path))
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_normalization() {
        assert_eq!(sqlite_url("sqlite::memory:").unwrap(), "sqlite::memory:");
        assert_eq!(
            sqlite_url("sqlite://flowpilot.db").unwrap(),
            "sqlite:flowpilot.db?mode=rwc"
        );
    }
}
