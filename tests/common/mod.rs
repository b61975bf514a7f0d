//! Shared test fixtures: in-memory and failing `ObjectStore` fakes, plus a
//! harness that drives the real router without binding a socket.

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use file_gateway::{
    models::file_entry::FileEntry,
    routes::routes::routes,
    services::storage::{FileObject, FileService, ObjectStore, StorageError, StorageResult},
};
use std::{collections::BTreeMap, sync::Arc};
use tower::ServiceExt;

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_REGION: &str = "eu-west-1";

struct SeededObject {
    content: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// In-memory `ObjectStore` listing keys in lexicographic order, the same
/// order S3 reports them.
#[derive(Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, SeededObject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        mut self,
        key: &str,
        content: &'static [u8],
        content_type: &str,
        modified_secs: i64,
    ) -> Self {
        self.objects.insert(
            key.to_string(),
            SeededObject {
                content: Bytes::from_static(content),
                content_type: content_type.to_string(),
                last_modified: DateTime::from_timestamp(modified_secs, 0).unwrap(),
            },
        );
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: Option<&str>) -> StorageResult<Vec<FileEntry>> {
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
            .map(|(key, obj)| FileEntry {
                key: key.clone(),
                size: obj.content.len() as i64,
                last_modified: obj.last_modified,
            })
            .collect())
    }

    async fn get(&self, key: &str) -> StorageResult<FileObject> {
        let obj = self
            .objects
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        let content = obj.content.clone();
        Ok(FileObject {
            content_type: Some(obj.content_type.clone()),
            content_length: Some(content.len() as i64),
            body: Box::pin(futures::stream::once(async move { Ok(content) })),
        })
    }
}

/// `ObjectStore` whose every call fails the way an unreachable endpoint does.
pub struct FailingStore;

fn provider_outage() -> StorageError {
    StorageError::Provider("dispatch failure: connection refused (os error 111)".into())
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn list(&self, _prefix: Option<&str>) -> StorageResult<Vec<FileEntry>> {
        Err(provider_outage())
    }

    async fn get(&self, _key: &str) -> StorageResult<FileObject> {
        Err(provider_outage())
    }
}

/// The full gateway router over an injected store.
#[derive(Clone)]
pub struct TestServer {
    router: Router,
}

impl TestServer {
    /// Router over a three-object fixture bucket.
    pub fn with_seeded_bucket() -> Self {
        let store = MemoryStore::new()
            .insert(
                "notes/readme.md",
                b"# Notes\n",
                "text/markdown",
                1_755_000_000,
            )
            .insert(
                "run-analysis/2025-08-19.json",
                br#"{"runs":3}"#,
                "application/json",
                1_755_561_600,
            )
            .insert(
                "run-analysis/2025-08-21.json",
                br#"{"runs":5}"#,
                "application/json",
                1_755_734_400,
            );
        Self::with_store(Arc::new(store))
    }

    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        let service = FileService::new(store, TEST_BUCKET, TEST_REGION);
        Self {
            router: routes().with_state(service),
        }
    }

    /// Issue a GET and return status, headers, and the collected body.
    pub async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    /// Issue a GET and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _headers, body) = self.get(uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }
}
