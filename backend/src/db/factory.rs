//! Repository factory for dependency injection.
//!
//! Builds the repository handed to the HTTP layer from runtime configuration.

use std::sync::Arc;

use tokio::task;

use super::repository::{IncidentRepository, RepositoryError, RepositoryResult};
use super::{SqliteConfig, SqliteRepository};
use crate::config::DatabaseSettings;

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use incidents_api::config::AppConfig;
/// use incidents_api::db::RepositoryFactory;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AppConfig::load()?;
///     let repo = RepositoryFactory::from_settings(&config.database).await?;
///     assert!(repo.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a SQLite repository.
    ///
    /// Opening the pool blocks, so it runs on the blocking thread pool.
    pub async fn create_sqlite(config: SqliteConfig) -> RepositoryResult<Arc<SqliteRepository>> {
        let repo = task::spawn_blocking(move || SqliteRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    /// Create the repository described by the `[database]` settings.
    pub async fn from_settings(
        settings: &DatabaseSettings,
    ) -> RepositoryResult<Arc<dyn IncidentRepository>> {
        if settings.path.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "database.path must not be empty",
            ));
        }
        let repo = Self::create_sqlite(settings.to_sqlite_config()).await?;
        Ok(repo as Arc<dyn IncidentRepository>)
    }
}
