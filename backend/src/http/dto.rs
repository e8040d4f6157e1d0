//! Data Transfer Objects for the HTTP API.
//!
//! Incidents are serialized directly from [`crate::models::Incident`]; only
//! the responses without a model counterpart live here.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
    /// Stored incident count, when the store could be queried
    pub incidents: Option<i64>,
}
