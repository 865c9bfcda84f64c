//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostService;
use quill_core::ports::PostRepository;
use quill_infra::{DatabaseConfig, InMemoryPostRepository};

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[cfg(feature = "postgres")]
    #[error("database connection failed: {0}")]
    Database(String),

    #[cfg(feature = "postgres")]
    #[error("database migration failed: {0}")]
    Migration(String),

    #[cfg(not(feature = "postgres"))]
    #[error("DATABASE_URL is set but the server was built without the postgres feature")]
    PostgresDisabled,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    /// Name of the storage backend, reported by `/health`.
    pub storage: &'static str,
}

impl AppState {
    /// State backed by an explicit repository.
    pub fn with_repository(repo: Arc<dyn PostRepository>, storage: &'static str) -> Self {
        Self {
            posts: PostService::new(repo),
            storage,
        }
    }

    /// Build the application state with the configured storage.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Result<Self, StartupError> {
        let state = match db_config {
            Some(config) => Self::with_repository(connect_postgres(config).await?, "postgres"),
            None => {
                tracing::warn!("DATABASE_URL not set. Running with in-memory post storage.");
                Self::with_repository(Arc::new(InMemoryPostRepository::new()), "memory")
            }
        };

        tracing::info!(storage = state.storage, "Application state initialized");

        Ok(state)
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(config: &DatabaseConfig) -> Result<Arc<dyn PostRepository>, StartupError> {
    use migration::{Migrator, MigratorTrait};
    use quill_infra::PostgresPostRepository;

    let conn = quill_infra::database::connect(config)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    if config.auto_migrate {
        Migrator::up(&conn, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresPostRepository::new(conn)))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(
    _config: &DatabaseConfig,
) -> Result<Arc<dyn PostRepository>, StartupError> {
    Err(StartupError::PostgresDisabled)
}
