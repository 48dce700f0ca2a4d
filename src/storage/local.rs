//! Filesystem-backed bucket.
//!
//! Objects are plain files under `<dir>/<bucket>/`. Public URLs use the same
//! `/storage/v1/object/public/<bucket>/` layout as Supabase, and the HTTP
//! server mounts the bucket directory at that prefix.

use std::path::{Component, Path, PathBuf};

use serde_json::json;
use showroom_common::{Error, Result};

use super::{ObjectStore, PUBLIC_OBJECT_PREFIX};

/// [`ObjectStore`] that keeps objects on local disk.
pub struct LocalStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalStore {
    /// Create a store for `bucket` under `dir`, publishing URLs below `public_base_url`.
    pub fn new(dir: PathBuf, bucket: &str, public_base_url: &str) -> Self {
        Self {
            root: dir.join(bucket),
            bucket: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory holding the bucket's objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the bucket directory if it does not exist yet.
    pub fn ensure_bucket(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// Map an object path to a file, refusing anything that escapes the bucket.
    fn file_for(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if path.is_empty() || escapes {
            return Err(Error::storage(format!("Invalid object path: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    #[tracing::instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        _content_type: &str,
        upsert: bool,
    ) -> Result<()> {
        let file = self.file_for(path)?;

        if !upsert && tokio::fs::try_exists(&file).await? {
            return Err(Error::storage_with_payload(
                format!("Object already exists: {}", path),
                json!({
                    "statusCode": "409",
                    "error": "Duplicate",
                    "message": "The resource already exists",
                }),
            ));
        }

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file, data).await?;

        tracing::debug!(file = %file.display(), "Wrote object");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn remove(&self, paths: &[String]) -> Result<()> {
        for path in paths {
            let file = self.file_for(path)?;
            match tokio::fs::remove_file(&file).await {
                Ok(()) => tracing::debug!(file = %file.display(), "Removed object"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(file = %file.display(), "Object already absent");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.public_base_url, PUBLIC_OBJECT_PREFIX, self.bucket, path
        )
    }
}
