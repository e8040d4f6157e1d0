//! Database module for incident storage.
//!
//! This module provides abstractions for database operations via the Repository pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  SqliteRepository (Diesel + r2d2)                       │
//! │  statements assembled by query.rs                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use incidents_api::db::{services, RepositoryFactory, SqliteConfig};
//! use incidents_api::models::ListQuery;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::create_sqlite(SqliteConfig::new("incidents.sqlite3")).await?;
//!     let newest = services::list_incidents(repo.as_ref(), &ListQuery::default()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "sqlite-repo"))]
compile_error!("Enable at least one repository backend feature.");

#[cfg(feature = "sqlite-repo")]
pub mod factory;
pub mod query;
pub mod repositories;
pub mod repository;
pub mod services;

pub use query::{build_list_statement, FilterClause, SelectStatement};
pub use repository::{ErrorContext, IncidentRepository, RepositoryError, RepositoryResult};

#[cfg(feature = "sqlite-repo")]
pub use factory::RepositoryFactory;
#[cfg(feature = "sqlite-repo")]
pub use repositories::{SqliteConfig, SqliteRepository, MEMORY_DATABASE};
