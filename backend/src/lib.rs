//! # Incidents API
//!
//! HTTP service over a SQLite table of crime incident records.
//!
//! Clients list incidents with filters, add one incident at a time, and
//! remove incidents by case number. Requests are checked against
//! declarative schemas before they reach the store, and every listing is
//! built as a single parameterized `SELECT`.
//!
//! ## Architecture
//!
//! - [`models`]: Incident shapes and date separator conversions
//! - [`validation`]: Schema engine and the endpoint schemas
//! - [`db`]: Statement assembly, repository trait, SQLite implementation, services
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod config;
pub mod db;
pub mod models;
pub mod validation;

#[cfg(feature = "http-server")]
pub mod http;
