//! Image normalization and publishing.
//!
//! Uploaded files are decoded, re-encoded as WebP at a fixed quality and
//! written to the object store under a path derived from the record they
//! belong to.

mod normalize;
mod service;

pub use normalize::{ImageNormalizer, WEBP_CONTENT_TYPE, WEBP_QUALITY};
pub use service::ImageService;
