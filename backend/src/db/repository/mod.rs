//! Repository trait for incident storage.
//!
//! The HTTP layer only ever talks to an `Arc<dyn IncidentRepository>`, which
//! is built once at start-up and handed to the router through its state.
//! Tests can substitute any other implementation.
//!
//! - [`error`]: Error types for repository operations

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{Incident, ListQuery, NewIncident};

/// Storage operations over the `Incidents` table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List incidents matching `query`, newest first.
    ///
    /// Rows come back exactly as stored; `date_time` still uses the stored
    /// date separator.
    async fn list_incidents(&self, query: &ListQuery) -> RepositoryResult<Vec<Incident>>;

    /// Insert one incident.
    ///
    /// # Returns
    /// * `Err(RepositoryError::QueryError)` - If the store rejects the row
    ///   (for example a duplicate case number)
    async fn insert_incident(&self, incident: &NewIncident) -> RepositoryResult<()>;

    /// Delete every incident with `case_number` in a single statement.
    ///
    /// # Returns
    /// * `Ok(n)` - Number of rows removed, `0` when none matched
    async fn delete_incident(&self, case_number: &str) -> RepositoryResult<usize>;

    /// Total number of stored incidents.
    async fn count_incidents(&self) -> RepositoryResult<i64>;
}
