//! Represents an object surfaced by the listing API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the bucket listing.
///
/// Carries the provider-reported metadata for an object, not its content.
/// Entries are rebuilt from the provider on every request and never cached.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FileEntry {
    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Size in bytes.
    pub size: i64,

    /// Timestamp when the object was last modified, as RFC 3339.
    pub last_modified: DateTime<Utc>,
}
