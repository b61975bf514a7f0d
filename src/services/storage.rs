//! Storage seam for the file gateway.
//!
//! `ObjectStore` abstracts the provider behind the two calls the gateway
//! needs (list and get), so handlers never depend on the AWS SDK directly.
//! `FileService` is the shared router state; it owns key validation and the
//! bucket identity shown on the homepage.

use crate::models::file_entry::FileEntry;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::{io, pin::Pin, sync::Arc};
use thiserror::Error;

/// A boxed stream of bytes for streaming object reads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

const MAX_OBJECT_KEY_LEN: usize = 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("storage provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A single object fetched from the provider: reported metadata plus the
/// body as a stream. The body is never buffered whole by the gateway.
pub struct FileObject {
    /// MIME type as reported by the provider, if any.
    pub content_type: Option<String>,

    /// Body length in bytes when the provider reports one.
    pub content_length: Option<i64>,

    /// Object content.
    pub body: ByteStream,
}

/// Read-only view of one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects in provider order, following provider pagination until
    /// the listing is exhausted. `prefix` narrows the listing provider-side.
    async fn list(&self, prefix: Option<&str>) -> StorageResult<Vec<FileEntry>>;

    /// Fetch a single object by key.
    async fn get(&self, key: &str) -> StorageResult<FileObject>;
}

/// FileService provides the gateway's read operations:
/// - List bucket contents (delegates to the provider; always the complete listing)
/// - Get object content (validates the key, then streams)
///
/// This struct intentionally holds no cache or session state; every request
/// goes back to the provider.
#[derive(Clone)]
pub struct FileService {
    /// Provider client behind the `ObjectStore` seam.
    pub store: Arc<dyn ObjectStore>,

    /// Bucket this gateway serves, fixed for the process lifetime.
    pub bucket: String,

    /// Region the bucket lives in.
    pub region: String,
}

impl FileService {
    /// Create a new FileService over the given store, bound to one bucket.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            region: region.into(),
        }
    }

    /// List bucket contents in provider order.
    pub async fn list_files(&self, prefix: Option<&str>) -> StorageResult<Vec<FileEntry>> {
        self.store.list(prefix).await
    }

    /// Fetch one object. The key is validated before any provider call, so
    /// a traversal-looking key is rejected as bad input rather than surfaced
    /// as a provider miss.
    pub async fn get_file(&self, key: &str) -> StorageResult<FileObject> {
        ensure_key_safe(key)?;
        self.store.get(key).await
    }
}

/// Basic key validation to avoid trivial path traversal vectors.
///
/// Keys are opaque identifiers for the provider, never filesystem paths.
/// Rejects keys that are empty, longer than 1024 bytes, begin with `/`,
/// contain `..`, or contain control characters or backslashes.
pub fn ensure_key_safe(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("must not be empty".into()));
    }
    if key.len() > MAX_OBJECT_KEY_LEN {
        return Err(StorageError::InvalidKey(format!(
            "must not exceed {} bytes",
            MAX_OBJECT_KEY_LEN
        )));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey("must not start with `/`".into()));
    }
    if key.contains("..") {
        return Err(StorageError::InvalidKey("must not contain `..`".into()));
    }
    if key.bytes().any(|b| b.is_ascii_control() || b == b'\\') {
        return Err(StorageError::InvalidKey(
            "must not contain control characters or `\\`".into(),
        ));
    }
    Ok(())
}
