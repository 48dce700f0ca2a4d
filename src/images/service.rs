//! Image service coordinating normalization and object storage.
//!
//! Route handlers never talk to the store directly. Uploads go through
//! [`ImageService::publish`], removals through [`ImageService::resolve`] and
//! [`ImageService::remove`].

use std::sync::Arc;

use showroom_common::paths::{resolve_object_path, StoragePath};
use showroom_common::Result;

use super::normalize::{ImageNormalizer, WEBP_CONTENT_TYPE};
use crate::storage::ObjectStore;

/// High-level image operations on top of an [`ObjectStore`].
pub struct ImageService {
    store: Arc<dyn ObjectStore>,
    normalizer: ImageNormalizer,
}

impl ImageService {
    /// Create a new `ImageService` with the default normalizer.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_normalizer(store, ImageNormalizer::default())
    }

    pub fn with_normalizer(store: Arc<dyn ObjectStore>, normalizer: ImageNormalizer) -> Self {
        Self { store, normalizer }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Normalize `data` to WebP, upload it at `path` and return its public URL.
    ///
    /// Uploads overwrite: two records whose names sanitize alike share one
    /// object, and the latest upload wins.
    #[tracing::instrument(skip(self, data), fields(path = %path, size = data.len()))]
    pub async fn publish(&self, path: &StoragePath, data: Vec<u8>) -> Result<String> {
        let webp = self.encode(data).await?;
        self.publish_encoded(path, webp).await
    }

    /// Normalize `data` to WebP without storing it.
    ///
    /// Replacements encode first so a bad file fails before the old
    /// object is discarded.
    pub async fn encode(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let webp = self.normalizer.normalize_blocking(data).await?;
        tracing::debug!(encoded = webp.len(), "Normalized image");
        Ok(webp)
    }

    /// Upload already-normalized WebP bytes at `path` and return the public URL.
    #[tracing::instrument(skip(self, webp), fields(path = %path, size = webp.len()))]
    pub async fn publish_encoded(&self, path: &StoragePath, webp: Vec<u8>) -> Result<String> {
        self.store
            .upload(path.as_str(), webp, WEBP_CONTENT_TYPE, true)
            .await?;

        let url = self.store.public_url(path.as_str());
        tracing::info!(%url, "Published image");
        Ok(url)
    }

    /// Map a public URL back to its path in this store's bucket.
    pub fn resolve(&self, url: &str) -> Result<String> {
        resolve_object_path(url, self.store.bucket())
    }

    /// Delete the object at `path`.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, path: &str) -> Result<()> {
        self.store.remove(&[path.to_string()]).await?;
        tracing::info!("Removed image");
        Ok(())
    }

    /// Best-effort removal of the object behind `url`.
    ///
    /// Used when a record's image is replaced. Failures are logged and swallowed.
    #[tracing::instrument(skip(self))]
    pub async fn discard(&self, url: &str) {
        let path = match self.resolve(url) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Not discarding previous image: {}", e);
                return;
            }
        };

        if let Err(e) = self.remove(&path).await {
            tracing::warn!(%path, "Failed to discard previous image: {}", e);
        }
    }
}
