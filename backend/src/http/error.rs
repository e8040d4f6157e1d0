//! HTTP error handling.
//!
//! Every error body is plain text. Validation failures are the only client
//! errors; a missing delete target and any store failure both map to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::db::repository::RepositoryError;
use crate::validation::ValidationError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Repository error, including a missing delete target
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(msg) => msg,
            AppError::Repository(e) => {
                if e.is_not_found() {
                    warn!("{}", e);
                } else {
                    error!("{}", e);
                }
                e.message().to_string()
            }
        };

        (status, message).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.message)
    }
}
