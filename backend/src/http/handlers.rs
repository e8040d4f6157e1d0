//! HTTP handlers for the REST API.
//!
//! Each handler validates its input against the matching schema, then
//! delegates to the service layer. Nothing reaches the store unless
//! validation succeeded.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use super::dto::HealthResponse;
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{Incident, ListQuery, NewIncident, RemoveIncident};
use crate::validation::{schemas, validate_as};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Query-string values are always text; integer fields are coerced during validation.
fn query_to_value(params: HashMap<String, String>) -> Value {
    Value::Object(
        params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    )
}

fn parse_json_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo = state.repository.as_ref();
    let db_status = match db_services::health_check(repo).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e.message()),
    };
    let incidents = db_services::count_incidents(repo).await.ok();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        incidents,
    }))
}

// =============================================================================
// Incidents
// =============================================================================

/// GET /incidents
///
/// List incidents, newest first, filtered by `code`, `neighborhood`, `grid`,
/// `start_date` and `end_date`, capped by `limit` (at most 1000).
pub async fn list_incidents(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult<Vec<Incident>> {
    let query: ListQuery = validate_as(&schemas::LIST_QUERY, &query_to_value(params))?;

    let incidents = db_services::list_incidents(state.repository.as_ref(), &query).await?;
    Ok(Json(incidents))
}

/// POST /new-incident
///
/// Store one incident. Responds `OK` as plain text.
pub async fn create_incident(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let incident: NewIncident = validate_as(&schemas::NEW_INCIDENT, &parse_json_body(&body)?)?;

    db_services::create_incident(state.repository.as_ref(), &incident).await?;
    Ok("OK")
}

/// DELETE /remove-incident
///
/// Remove every incident with the given case number. A case number that is
/// not stored is reported as a server error.
pub async fn remove_incident(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, AppError> {
    let request: RemoveIncident =
        validate_as(&schemas::REMOVE_INCIDENT, &parse_json_body(&body)?)?;

    db_services::remove_incident(state.repository.as_ref(), &request.case_number).await?;
    Ok(format!("Deleted incident {}", request.case_number))
}
