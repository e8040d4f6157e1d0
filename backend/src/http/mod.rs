//! HTTP server module for the incidents API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Schema validation of query strings and JSON bodies     │
//! │  - JSON / plain-text responses                            │
//! │  - CORS, tracing, error mapping                           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (db/services.rs)                           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - SqliteRepository                                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/incidents` | 200, JSON array of incidents |
//! | POST | `/new-incident` | 200, `OK` |
//! | DELETE | `/remove-incident` | 200, confirmation text |
//! | GET | `/health` | 200, JSON status |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::create_router;
pub use state::AppState;
