//! Object storage gateway.
//!
//! Every image lives in one bucket. The [`ObjectStore`] trait covers the
//! three calls the service needs (upload, remove, public URL) and has two
//! implementations: [`SupabaseStore`] talks to Supabase Storage over HTTP,
//! [`LocalStore`] keeps the bucket on local disk.

mod local;
mod supabase;

pub use local::LocalStore;
pub use supabase::SupabaseStore;

use std::sync::Arc;

use anyhow::{Context, Result};
use showroom_common::Result as StoreResult;

use crate::config::{StorageBackend, StorageConfig};

/// Path under which every public object URL is served.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";

/// A single bucket of objects addressed by slash-separated paths.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store writes to.
    fn bucket(&self) -> &str;

    /// Write `data` at `path`. With `upsert` unset an existing object is an error.
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> StoreResult<()>;

    /// Delete the objects at `paths`.
    async fn remove(&self, paths: &[String]) -> StoreResult<()>;

    /// Public URL of the object at `path`. Pure; does not check existence.
    fn public_url(&self, path: &str) -> String;
}

/// Build the store selected by the configuration.
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Supabase => {
            let url = config
                .url
                .as_deref()
                .context("Supabase storage requires storage.url")?;
            let key = config
                .service_key
                .as_deref()
                .context("Supabase storage requires storage.service_key")?;

            tracing::info!(url, bucket = %config.bucket, "Using Supabase storage");
            Ok(Arc::new(SupabaseStore::new(url, key, &config.bucket)?))
        }
        StorageBackend::Local => {
            tracing::info!(
                dir = %config.local_dir.display(),
                bucket = %config.bucket,
                "Using local storage"
            );
            let store = LocalStore::new(
                config.local_dir.clone(),
                &config.bucket,
                &config.public_base_url,
            );
            store
                .ensure_bucket()
                .with_context(|| format!("Failed to create bucket directory {:?}", store.root()))?;
            Ok(Arc::new(store))
        }
    }
}
