//! Multipart form parsing shared by the create and update handlers.

use std::collections::HashMap;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use bytes::Bytes;

use super::error::ApiError;

/// Text fields plus at most one file from a multipart request.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<Bytes>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), e.body_text())
}

impl UploadForm {
    /// Drain `multipart`, keeping the part named `file_field` as the upload.
    ///
    /// Empty text values are dropped, and so is an empty file part, so a
    /// browser form submitted without a file reads as "no file". A request
    /// that is not `multipart/form-data` at all carries none of the required
    /// fields and is answered with the route's `required` message.
    pub async fn read(
        multipart: Result<Multipart, MultipartRejection>,
        file_field: &str,
        required: &str,
    ) -> Result<Self, ApiError> {
        let mut multipart = multipart.map_err(|rejection| {
            tracing::debug!("Rejected non-multipart body: {}", rejection.body_text());
            ApiError::bad_request(required)
        })?;
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == file_field {
                let data = field.bytes().await.map_err(multipart_error)?;
                if !data.is_empty() {
                    tracing::debug!(field = %name, size = data.len(), "Received file");
                    form.file = Some(data);
                }
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            if !value.is_empty() {
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Non-empty text value of `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Take the uploaded file, leaving `None` behind.
    pub fn take_file(&mut self) -> Option<Bytes> {
        self.file.take()
    }
}

#[cfg(test)]
impl UploadForm {
    pub(crate) fn from_parts(fields: &[(&str, &str)], file: Option<&[u8]>) -> Self {
        Self {
            fields: fields
                .iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: file.filter(|f| !f.is_empty()).map(Bytes::copy_from_slice),
        }
    }
}
