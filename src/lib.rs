//! Read-only HTTP gateway in front of a single S3 bucket.
//!
//! The binary in `main.rs` wires configuration, the S3 client, and the
//! router over this library.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
