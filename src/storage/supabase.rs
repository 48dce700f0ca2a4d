//! Supabase Storage client.

use reqwest::{Client, Response};
use serde_json::{json, Value};
use showroom_common::{Error, Result};

use super::{ObjectStore, PUBLIC_OBJECT_PREFIX};

/// [`ObjectStore`] backed by the Supabase Storage REST API.
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStore {
    /// Create a client for `bucket` on the project at `base_url`.
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> anyhow::Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        url::Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid Supabase URL {}: {}", base_url, e))?;

        Ok(Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/object/{}", self.base_url, self.bucket)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }
}

/// Turn a non-2xx response into a storage error carrying the upstream body.
async fn check_response(response: Response, context: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let text = response.text().await.unwrap_or_default();
    let payload =
        serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "message": text }));

    Err(Error::storage_with_payload(
        format!("{} ({})", context, status),
        payload,
    ))
}

#[async_trait::async_trait]
impl ObjectStore for SupabaseStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    #[tracing::instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<()> {
        let response = self
            .authorized(self.client.post(self.object_url(path)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(data)
            .send()
            .await
            .map_err(|e| Error::storage(format!("Upload request failed: {}", e)))?;

        check_response(response, "Upload rejected").await?;
        tracing::debug!("Uploaded object");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn remove(&self, paths: &[String]) -> Result<()> {
        let response = self
            .authorized(self.client.delete(self.bucket_url()))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await
            .map_err(|e| Error::storage(format!("Remove request failed: {}", e)))?;

        check_response(response, "Remove rejected").await?;
        tracing::debug!(count = paths.len(), "Removed objects");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url, PUBLIC_OBJECT_PREFIX, self.bucket, path
        )
    }
}
