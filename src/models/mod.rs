//! Core data models for the file gateway.
//!
//! These are transient views over what the storage provider reports for a
//! request; nothing here is persisted by the gateway itself. They serialize
//! naturally as JSON via `serde`.

pub mod file_entry;
