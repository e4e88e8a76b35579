//! Isolated databases for tests

use sea_orm_migration::MigratorTrait;

use crate::container::testing::{TestContainer, TestContainerGuard};
use crate::database::{DatabaseConfig, DbConnection};
use crate::error::FrameworkError;

/// A migrated in-memory SQLite database bound into the test container
///
/// `DB::connection()` on the same thread resolves to this database until the
/// value is dropped.
///
/// ```rust,ignore
/// let _db = TestDatabase::fresh::<Migrator>().await.expect("test db");
/// ```
pub struct TestDatabase {
    conn: DbConnection,
    _guard: TestContainerGuard,
}

impl TestDatabase {
    pub async fn fresh<M: MigratorTrait>() -> Result<Self, FrameworkError> {
        // One connection, otherwise each pooled connection sees its own empty database
        let config = DatabaseConfig::builder()
            .url("sqlite::memory:")
            .max_connections(1)
            .min_connections(1)
            .logging(false)
            .build();

        let conn = DbConnection::connect(&config).await?;
        M::up(conn.inner(), None).await?;

        let guard = TestContainer::fake();
        TestContainer::singleton(conn.clone());

        Ok(Self {
            conn,
            _guard: guard,
        })
    }

    pub fn conn(&self) -> &DbConnection {
        &self.conn
    }
}
