//! HTTP handlers for the homepage, bucket listing, and file retrieval.
//! Streams object bodies to avoid buffering in memory and delegates storage
//! concerns to `FileService`.

use crate::{
    errors::AppError,
    models::file_entry::FileEntry,
    services::storage::{FileObject, FileService},
};
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, Response},
};
use chrono::SecondsFormat;
use serde::Deserialize;

/// Query params accepted by `GET /api/files`.
#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    pub prefix: Option<String>,
}

/// Number of entries shown on the homepage before the list is cut off.
const HOMEPAGE_MAX_FILES: usize = 25;

/// `GET /` — HTML summary of the bucket and its current contents.
///
/// A listing failure degrades the page to bucket identity plus an error note;
/// the route itself still answers 200.
pub async fn index(State(service): State<FileService>) -> Html<String> {
    match service.list_files(None).await {
        Ok(entries) => Html(render_home(&service.bucket, &service.region, &entries, None)),
        Err(err) => {
            tracing::warn!("homepage listing failed: {err}");
            Html(render_home(
                &service.bucket,
                &service.region,
                &[],
                Some("Unable to list bucket contents right now."),
            ))
        }
    }
}

/// `GET /api/files` — JSON array of objects in the bucket, optionally
/// narrowed to `?prefix=`.
pub async fn list_files(
    State(service): State<FileService>,
    Query(q): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileEntry>>, AppError> {
    let prefix = q.prefix.as_deref().filter(|p| !p.is_empty());
    let entries = service.list_files(prefix).await?;
    Ok(Json(entries))
}

/// `GET /api/files/{*filename}` — stream one object back verbatim.
pub async fn get_file(
    State(service): State<FileService>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let FileObject {
        content_type,
        content_length,
        body,
    } = service.get_file(&filename).await?;

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = StatusCode::OK;
    set_content_headers(
        response.headers_mut(),
        content_type.as_deref(),
        content_length,
    );
    Ok(response)
}

fn set_content_headers(
    headers: &mut HeaderMap,
    content_type: Option<&str>,
    content_length: Option<i64>,
) {
    let content_type = content_type.unwrap_or("application/octet-stream");
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    // S3 omits the length for some responses; only promise what we know.
    if let Some(length) = content_length {
        headers.insert(
            header::CONTENT_LENGTH,
            HeaderValue::from_str(&length.max(0).to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("0")),
        );
    }
}

/// Inline stylesheet for the homepage.
const HOME_STYLE: &str = "\
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
  min-height: 100vh;
  display: flex;
  align-items: center;
  justify-content: center;
  padding: 20px;
}
.container {
  background: white;
  border-radius: 20px;
  box-shadow: 0 20px 60px rgba(0,0,0,0.3);
  padding: 40px;
  max-width: 800px;
  width: 100%;
}
h1 { color: #333; margin-bottom: 10px; font-size: 2.5em; }
.subtitle { color: #666; margin-bottom: 30px; font-size: 1.1em; }
.bucket-info {
  background: #f8f9fa;
  padding: 20px;
  border-radius: 10px;
  margin-top: 20px;
}
.bucket-info h2 { color: #333; margin-bottom: 15px; font-size: 1.5em; }
.file-list { list-style: none; }
.file-list li {
  padding: 10px;
  margin: 5px 0;
  background: white;
  border-radius: 5px;
  border-left: 4px solid #667eea;
}
.status.error {
  background: #fdecea;
  border-left: 4px solid #c0392b;
  color: #c0392b;
  padding: 15px;
  border-radius: 5px;
  margin-top: 20px;
}
code {
  background: #f1f1f1;
  padding: 2px 6px;
  border-radius: 3px;
  font-family: 'Courier New', monospace;
}
";

/// Render the homepage as one self-contained HTML document.
fn render_home(bucket: &str, region: &str, entries: &[FileEntry], error: Option<&str>) -> String {
    let mut page = String::from(concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"en\">\n<head>\n",
        "<meta charset=\"UTF-8\">\n",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        "<title>File Gateway</title>\n<style>\n",
    ));
    page.push_str(HOME_STYLE);
    page.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    page.push_str("<h1>File Gateway</h1>\n");
    page.push_str("<p class=\"subtitle\">Read-only S3 file viewer</p>\n");

    page.push_str("<div class=\"bucket-info\">\n<h2>Bucket</h2>\n");
    page.push_str(&format!(
        "<p>Name: <code>{}</code></p>\n",
        html_escape(bucket)
    ));
    page.push_str(&format!(
        "<p>Region: <code>{}</code></p>\n",
        html_escape(region)
    ));
    page.push_str("</div>\n");

    if let Some(message) = error {
        page.push_str(&format!(
            "<div class=\"status error\">{}</div>\n",
            html_escape(message)
        ));
    } else {
        page.push_str("<div class=\"bucket-info\">\n<h2>Contents</h2>\n");
        if entries.is_empty() {
            page.push_str("<p><em>Bucket is empty.</em></p>\n");
        } else {
            page.push_str(&format!("<p>{} objects</p>\n", entries.len()));
            if let Some(latest) = entries.iter().max_by_key(|e| e.last_modified) {
                page.push_str(&format!(
                    "<p>Latest: <code>{}</code> at {}</p>\n",
                    html_escape(&latest.key),
                    latest
                        .last_modified
                        .to_rfc3339_opts(SecondsFormat::Secs, true)
                ));
            }
            page.push_str("<ul class=\"file-list\">\n");
            for entry in entries.iter().take(HOMEPAGE_MAX_FILES) {
                page.push_str(&format!(
                    "<li><code>{}</code> ({} bytes)</li>\n",
                    html_escape(&entry.key),
                    entry.size
                ));
            }
            page.push_str("</ul>\n");
            if entries.len() > HOMEPAGE_MAX_FILES {
                page.push_str(&format!(
                    "<p>and {} more</p>\n",
                    entries.len() - HOMEPAGE_MAX_FILES
                ));
            }
        }
        page.push_str("</div>\n");
    }

    page.push_str("</div>\n</body>\n</html>\n");
    page
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
