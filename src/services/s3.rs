//! S3-backed `ObjectStore` using the AWS SDK.

use crate::config::AppConfig;
use crate::models::file_entry::FileEntry;
use crate::services::storage::{ByteStream, FileObject, ObjectStore, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::io;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::instrument;

/// Read-only S3 client bound to a single bucket.
///
/// Every provider call is bounded by the configured operation timeout so a
/// stalled backend cannot pin a request worker indefinitely.
pub struct S3Store {
    client: Client,
    bucket: String,
    op_timeout: Duration,
}

impl S3Store {
    /// Build the client from the ambient AWS credential chain.
    ///
    /// When `AWS_ENDPOINT_URL` points at an S3-compatible service the client
    /// switches to path-style addressing (`endpoint/bucket/key`), which
    /// MinIO-style endpoints require. Against real AWS no endpoint override
    /// is set and the default virtual-hosted style is used.
    pub async fn connect(cfg: &AppConfig) -> Self {
        let region = aws_config::Region::new(cfg.region.clone());
        let credentials =
            aws_config::default_provider::credentials::DefaultCredentialsChain::builder()
                .region(region.clone())
                .build()
                .await;

        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        if let Some(endpoint_url) = &cfg.endpoint_url {
            builder = builder.endpoint_url(endpoint_url).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: cfg.bucket.clone(),
            op_timeout: Duration::from_secs(cfg.request_timeout_secs),
        }
    }
}

/// Convert a GetObject failure. Only the typed `NoSuchKey` error becomes
/// `NotFound`: a missing bucket answers HTTP 404 as well and must stay a
/// provider error.
fn map_get_error(err: SdkError<GetObjectError>, key: &str) -> StorageError {
    if let SdkError::ServiceError(ref service_err) = err
        && service_err.err().is_no_such_key()
    {
        return StorageError::NotFound(key.to_string());
    }
    provider_error(err)
}

/// Continuation token for the next listing page, or `None` when the listing
/// is finished. A truncated page without a token also ends the listing
/// rather than refetching the first page.
fn next_page_token(output: &ListObjectsV2Output) -> Option<String> {
    if output.is_truncated() == Some(true) {
        output.next_continuation_token().map(|s| s.to_string())
    } else {
        None
    }
}

fn provider_error<E>(err: SdkError<E>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::Provider(Box::new(err))
}

fn timeout_error(limit: Duration) -> StorageError {
    StorageError::Io(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("S3 request timed out after {}s", limit.as_secs()),
    ))
}

/// Convert the provider timestamp to chrono. Timestamps chrono cannot
/// represent fall back to the epoch.
fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()).unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl ObjectStore for S3Store {
    #[instrument(skip(self), fields(backend = "s3"))]
    async fn list(&self, prefix: Option<&str>) -> StorageResult<Vec<FileEntry>> {
        let mut entries = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(&self.bucket);
            if let Some(prefix) = prefix {
                request = request.prefix(prefix);
            }
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let output = tokio::time::timeout(self.op_timeout, request.send())
                .await
                .map_err(|_| timeout_error(self.op_timeout))?
                .map_err(provider_error)?;

            for obj in output.contents() {
                let Some(key) = obj.key() else { continue };
                entries.push(FileEntry {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified: obj
                        .last_modified()
                        .map(to_chrono)
                        .unwrap_or(DateTime::UNIX_EPOCH),
                });
            }

            match next_page_token(&output) {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        Ok(entries)
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn get(&self, key: &str) -> StorageResult<FileObject> {
        let request = self.client.get_object().bucket(&self.bucket).key(key);
        let output = tokio::time::timeout(self.op_timeout, request.send())
            .await
            .map_err(|_| timeout_error(self.op_timeout))?
            .map_err(|err| map_get_error(err, key))?;

        let content_type = output.content_type().map(|s| s.to_string());
        let content_length = output.content_length();

        // Wrap the SDK body with ReaderStream so the response streams through
        // without materializing the object in memory.
        let reader = output.body.into_async_read();
        let body: ByteStream =
            Box::pin(ReaderStream::new(reader).map(|chunk| chunk.map_err(StorageError::Io)));

        Ok(FileObject {
            content_type,
            content_length,
            body,
        })
    }
}
