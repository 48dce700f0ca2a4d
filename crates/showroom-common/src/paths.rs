//! Storage path utilities.
//!
//! Objects live in one bucket under `<prefix>/<sanitized>.webp`, where the
//! prefix is `banners`, `clients` or `services/<folder>`. This module builds
//! those paths from user input and maps a stored public URL back onto the
//! bucket-relative path when an object has to be removed.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::types::EntityKind;

/// Extension every stored image carries.
pub const IMAGE_EXTENSION: &str = "webp";

/// Map an arbitrary display name onto a storage-safe token.
///
/// Every character outside `[a-zA-Z0-9]` becomes `_` and the result is
/// lower-cased. Replacement counts UTF-16 code units, so a character outside
/// the Basic Multilingual Plane (an emoji, say) becomes `__`. There is no
/// length cap and no collision handling: names that differ only in
/// punctuation produce the same token.
///
/// # Examples
///
/// ```
/// use showroom_common::paths::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Spring Sale!"), "spring_sale_");
/// assert_eq!(sanitize_filename("A/B"), sanitize_filename("A-B"));
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    out
}

/// Bucket-relative path of a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    /// Build `<prefix>/<sanitized name>.webp`.
    pub fn new(prefix: &str, name: &str) -> Self {
        Self(format!(
            "{}/{}.{}",
            prefix,
            sanitize_filename(name),
            IMAGE_EXTENSION
        ))
    }

    /// Path for a banner image, keyed by title.
    pub fn banner(title: &str) -> Self {
        Self::new(EntityKind::Banner.prefix(), title)
    }

    /// Path for a client logo, keyed by client name.
    pub fn client(name: &str) -> Self {
        Self::new(EntityKind::Client.prefix(), name)
    }

    /// Path for a service image under its category folder.
    pub fn service(folder: &str, title: &str) -> Self {
        Self::new(&format!("{}/{}", EntityKind::Service.prefix(), folder), title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Recover the bucket-relative object path from a public URL.
///
/// The URL path is split on `/`, the first segment equal to `bucket` is
/// located, and everything after it is the object path. Segments are kept
/// exactly as they appear in the URL.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when the URL does not parse, has no bucket
/// segment, or names no object after the bucket.
///
/// # Examples
///
/// ```
/// use showroom_common::paths::resolve_object_path;
///
/// let url = "https://host/storage/v1/object/public/gsl/clients/acme.webp";
/// assert_eq!(resolve_object_path(url, "gsl").unwrap(), "clients/acme.webp");
/// assert!(resolve_object_path("https://host/other/acme.webp", "gsl").is_err());
/// ```
pub fn resolve_object_path(public_url: &str, bucket: &str) -> Result<String> {
    let url = Url::parse(public_url)
        .map_err(|e| Error::invalid_url(format!("{public_url}: {e}")))?;

    let segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(|| Error::invalid_url(format!("{public_url}: URL has no path")))?
        .collect();

    let bucket_index = segments
        .iter()
        .position(|segment| *segment == bucket)
        .ok_or_else(|| {
            Error::invalid_url(format!("{public_url}: bucket '{bucket}' not found in path"))
        })?;

    let object_path = segments[bucket_index + 1..].join("/");
    if object_path.is_empty() {
        return Err(Error::invalid_url(format!(
            "{public_url}: no object after bucket '{bucket}'"
        )));
    }

    Ok(object_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://abc.supabase.co/storage/v1/object/public/gsl";

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_filename("Spring Sale!"), "spring_sale_");
        assert_eq!(sanitize_filename("ACME Corp"), "acme_corp");
        assert_eq!(sanitize_filename("rack-a.01"), "rack_a_01");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_filename("Café"), "caf_");
        assert_eq!(sanitize_filename("日本"), "__");
    }

    #[test]
    fn test_sanitize_astral_chars_count_twice() {
        assert_eq!(sanitize_filename("😀 Sale"), "___sale");
        assert_eq!(sanitize_filename("Promo 🎉🎉"), "promo_____");
    }

    #[test]
    fn test_sanitize_collisions() {
        // Known hazard: these all land on the same storage key.
        assert_eq!(sanitize_filename("A/B"), "a_b");
        assert_eq!(sanitize_filename("A-B"), "a_b");
        assert_eq!(sanitize_filename("a b"), "a_b");
    }

    #[test]
    fn test_storage_path_banner() {
        assert_eq!(
            StoragePath::banner("Spring Sale!").as_str(),
            "banners/spring_sale_.webp"
        );
    }

    #[test]
    fn test_storage_path_client() {
        assert_eq!(StoragePath::client("Acme").as_str(), "clients/acme.webp");
    }

    #[test]
    fn test_storage_path_service() {
        assert_eq!(
            StoragePath::service("ks", "Rack A").as_str(),
            "services/ks/rack_a.webp"
        );
        assert_eq!(
            StoragePath::service("others", "Rack A").to_string(),
            "services/others/rack_a.webp"
        );
    }

    #[test]
    fn test_resolve_client_url() {
        let url = "https://host/storage/v1/object/public/gsl/clients/acme.webp";
        assert_eq!(resolve_object_path(url, "gsl").unwrap(), "clients/acme.webp");
    }

    #[test]
    fn test_resolve_nested_service_url() {
        let url = format!("{BASE}/services/ks/rack_a.webp");
        assert_eq!(
            resolve_object_path(&url, "gsl").unwrap(),
            "services/ks/rack_a.webp"
        );
    }

    #[test]
    fn test_resolve_is_left_inverse_of_forward() {
        let paths = [
            StoragePath::banner("Spring Sale!"),
            StoragePath::client("ACME Corp"),
            StoragePath::service("ws", "Denim Line"),
            StoragePath::service("others", "x"),
        ];
        for path in paths {
            let url = format!("{BASE}/{path}");
            assert_eq!(resolve_object_path(&url, "gsl").unwrap(), path.as_str());
        }
    }

    #[test]
    fn test_resolve_ignores_query_string() {
        let url = format!("{BASE}/banners/a.webp?v=2");
        assert_eq!(resolve_object_path(&url, "gsl").unwrap(), "banners/a.webp");
    }

    #[test]
    fn test_resolve_uses_first_bucket_segment() {
        let url = format!("{BASE}/banners/gsl/a.webp");
        assert_eq!(
            resolve_object_path(&url, "gsl").unwrap(),
            "banners/gsl/a.webp"
        );
    }

    #[test]
    fn test_resolve_missing_bucket() {
        let url = "https://host/storage/v1/object/public/other/clients/acme.webp";
        let err = resolve_object_path(url, "gsl").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_resolve_bucket_must_be_whole_segment() {
        let url = "https://host/storage/v1/object/public/gslx/clients/acme.webp";
        assert!(matches!(
            resolve_object_path(url, "gsl"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_resolve_unparsable() {
        assert!(matches!(
            resolve_object_path("not a url", "gsl"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            resolve_object_path("mailto:gsl@example.com", "gsl"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_resolve_nothing_after_bucket() {
        let url = "https://host/storage/v1/object/public/gsl";
        assert!(matches!(
            resolve_object_path(url, "gsl"),
            Err(Error::InvalidUrl(_))
        ));
    }
}
