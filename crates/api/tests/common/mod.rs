use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use maktaba_core::store::FileStore;
use sqlx::SqlitePool;
use tower::ServiceExt;

use maktaba_api::config::ServerConfig;
use maktaba_api::router::build_app_router;
use maktaba_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database_url: "sqlite::memory:".to_string(),
        upload_dir: "uploads".to_string(),
        static_dir: "static".to_string(),
    }
}

/// Build the full application router over a temporary upload directory.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses. The returned `TempDir`
/// keeps the upload directory alive for the test's duration.
pub fn build_test_app(pool: SqlitePool) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp upload dir");
    let store = FileStore::open(dir.path()).expect("open file store");
    (app_with_store(pool, store), dir)
}

/// Like [`build_test_app`] but with a small file-size limit, so oversize
/// uploads can be exercised without building 50 MiB request bodies.
pub fn build_test_app_with_limit(
    pool: SqlitePool,
    max_bytes: u64,
) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp upload dir");
    let store = FileStore::with_max_bytes(dir.path(), max_bytes).expect("open file store");
    (app_with_store(pool, store), dir)
}

fn app_with_store(pool: SqlitePool, store: FileStore) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        files: Arc::new(store),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "maktaba-test-boundary";

/// Build a multipart/form-data body from text fields plus an optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart upload to `/api/books`.
pub async fn post_upload(
    app: Router,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/books")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Upload a small valid book and return its server-assigned ID.
pub async fn upload_sample(app: Router, title: &str, author: &str) -> i64 {
    let response = post_upload(
        app,
        &[("title", title), ("author", author)],
        Some(("sample.pdf", b"%PDF-1.4 sample content")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}
