//! High-level incident operations.
//!
//! These functions sit between the HTTP handlers and any
//! [`IncidentRepository`] implementation. They own the behaviour that must be
//! the same for every backend: display formatting of listed rows and the
//! not-found rule for deletions.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  HTTP handlers (validation, status codes)   │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │  Service layer (services.rs)                │
//! └───────────────────┬─────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────┐
//! │  IncidentRepository (SQLite via Diesel)     │
//! └─────────────────────────────────────────────┘
//! ```

use log::{info, warn};

use super::repository::{ErrorContext, IncidentRepository, RepositoryError, RepositoryResult};
use crate::models::{Incident, ListQuery, NewIncident};

/// Check if the database connection is healthy.
pub async fn health_check<R: IncidentRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Total number of stored incidents.
pub async fn count_incidents<R: IncidentRepository + ?Sized>(repo: &R) -> RepositoryResult<i64> {
    repo.count_incidents().await
}

/// List incidents matching `query`, newest first, with `date_time` in
/// display form (`YYYY-MM-DD HH:MM:SS`).
pub async fn list_incidents<R: IncidentRepository + ?Sized>(
    repo: &R,
    query: &ListQuery,
) -> RepositoryResult<Vec<Incident>> {
    let incidents = repo.list_incidents(query).await?;
    Ok(incidents.into_iter().map(Incident::into_display).collect())
}

/// Store one new incident.
pub async fn create_incident<R: IncidentRepository + ?Sized>(
    repo: &R,
    incident: &NewIncident,
) -> RepositoryResult<()> {
    match repo.insert_incident(incident).await {
        Ok(()) => {
            info!("Created incident {}", incident.case_number);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to create incident {}: {}", incident.case_number, e);
            Err(e)
        }
    }
}

/// Remove every incident with `case_number`.
///
/// # Returns
/// * `Ok(n)` - Number of rows removed, always at least one
/// * `Err(RepositoryError::NotFound)` - If no incident has that case number
pub async fn remove_incident<R: IncidentRepository + ?Sized>(
    repo: &R,
    case_number: &str,
) -> RepositoryResult<usize> {
    let removed = repo.delete_incident(case_number).await?;
    if removed == 0 {
        return Err(RepositoryError::not_found_with_context(
            format!("Incident with case number {} does not exist", case_number),
            ErrorContext::new("remove_incident")
                .with_entity("incident")
                .with_entity_id(case_number),
        ));
    }

    info!("Removed {} row(s) for incident {}", removed, case_number);
    Ok(removed)
}
