//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a local object
//! store in a temporary directory, and the full router. Requests go through
//! `tower::ServiceExt::oneshot`, no socket involved.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use showroom::config::{Config, StorageBackend};
use showroom::images::ImageService;
use showroom::server::{create_router, AppContext};
use showroom::storage::{LocalStore, ObjectStore};
use showroom_common::CategoryFolders;
use showroom_db::pool::{init_memory_pool, DbPool};

pub const BUCKET: &str = "gsl";
pub const PUBLIC_BASE: &str = "http://localhost:8080";

/// Test harness wrapping a fully-constructed router.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub app: Router,
    pub dir: TempDir,
}

impl TestHarness {
    /// In-memory DB and a local store under a fresh temp directory.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Like [`new`](Self::new) but starting from `config`. The storage
    /// section is pointed at the temp directory.
    pub fn with_config(mut config: Config) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = LocalStore::new(dir.path().to_path_buf(), BUCKET, PUBLIC_BASE);
        store.ensure_bucket().expect("failed to create bucket dir");

        config.storage.backend = StorageBackend::Local;
        config.storage.bucket = BUCKET.to_string();
        config.storage.local_dir = dir.path().to_path_buf();
        config.storage.public_base_url = PUBLIC_BASE.to_string();

        Self::build(config, Arc::new(store), dir)
    }

    /// Harness using `store` for objects (e.g. a Supabase client against a mock).
    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut config = Config::default();
        config.storage.url = Some("http://mock.invalid".into());
        config.storage.service_key = Some("test-key".into());
        Self::build(config, store, dir)
    }

    fn build(config: Config, store: Arc<dyn ObjectStore>, dir: TempDir) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(
            config,
            db.clone(),
            ImageService::new(store),
            CategoryFolders::default(),
        );
        let app = create_router(ctx.clone());
        Self { ctx, db, app, dir }
    }

    /// Get a database connection from the pool.
    ///
    /// The test pool holds one connection; drop it before sending a request.
    pub fn conn(&self) -> showroom_db::pool::PooledConnection {
        showroom_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// File backing the object at `path` in the local bucket.
    pub fn object_file(&self, path: &str) -> PathBuf {
        self.dir.path().join(BUCKET).join(path)
    }

    /// Public URL the local store produces for `path`.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", PUBLIC_BASE, BUCKET, path)
    }

    /// Place an object directly in the local bucket.
    pub fn put_object(&self, path: &str, data: &[u8]) {
        let file = self.object_file(path);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, data).unwrap();
    }

    /// Send a request and return the status plus the JSON body (Null when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(Method::DELETE, uri, body).await
    }

    /// Send `body` as `application/json`.
    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartBody {
    boundary: &'static str,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "showroom-test-boundary",
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, filename
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: Method, uri: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.buf))
            .unwrap()
    }
}

/// Small PNG with a flat colour.
pub fn png(r: u8, g: u8, b: u8) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(8, 8, Rgb([r, g, b]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Whether `bytes` start with a RIFF/WEBP header.
pub fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}
