//! Taskboard REST API
//!
//! This crate provides the Axum-based HTTP API for Taskboard: signup and
//! login, the token-protected identity endpoint, and the project/task CRUD
//! routes.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
