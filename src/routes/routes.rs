//! Defines routes for the read-only file gateway.
//!
//! ## Structure
//! - `GET /health`                  — liveness probe
//! - `GET /`                        — HTML bucket summary
//! - `GET /api/files`               — JSON listing (supports `?prefix=`)
//! - `GET /api/files/{*filename}`   — download one object
//!
//! The wildcard `*filename` allows nested keys like `run-analysis/2025-08-19.json`.

use crate::{
    handlers::{
        file_handlers::{get_file, index, list_files},
        health_handlers::health,
    },
    services::storage::FileService,
};
use axum::{Router, routing::get};

/// Build and return the router for all gateway routes.
///
/// The router carries shared state (`FileService`) to all handlers.
pub fn routes() -> Router<FileService> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/api/files", get(list_files))
        .route("/api/files/{*filename}", get(get_file))
}
