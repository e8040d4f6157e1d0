//! Repository implementations module.
//!
//! - `sqlite`: SQLite implementation with Diesel ORM
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

#[cfg(feature = "sqlite-repo")]
pub use sqlite::{SqliteConfig, SqliteRepository, MEMORY_DATABASE};
