//! Database primitives shared by the server binary and the test harness.

use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use thiserror::Error;
use tracing::info;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] DbErr),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[source] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings. The URL comes from the caller (CLI/env), never from source.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    url: String,
    max_connections: u32,
}

impl DatabaseSettings {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    // Every connection to an in-memory SQLite database opens a fresh, empty database.
    fn pool_size(&self) -> u32 {
        if self.url.contains(":memory:") {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.pool_size())
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let pool = Database::connect(options).await.map_err(DbError::Connect)?;
    info!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}

/// Apply every pending migration.
pub async fn migrate(pool: &DbPool) -> DbResult<()> {
    Migrator::up(pool, None).await.map_err(DbError::Migrate)?;
    info!("database migrations applied");
    Ok(())
}

/// Round-trip a trivial query; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}
