//! Re-encoding of uploads into lossy WebP.

use image::DynamicImage;
use showroom_common::{Error, Result};

/// Quality factor used for every stored image.
pub const WEBP_QUALITY: f32 = 60.0;

/// MIME type of normalized output.
pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// Decodes any supported image and re-encodes it as WebP.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    quality: f32,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            quality: WEBP_QUALITY,
        }
    }
}

impl ImageNormalizer {
    pub fn with_quality(quality: f32) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Decode `data` and return lossy WebP bytes.
    ///
    /// CPU bound; call from a blocking thread when on the async runtime.
    pub fn normalize(&self, data: &[u8]) -> Result<Vec<u8>> {
        let img = image::load_from_memory(data).map_err(|e| Error::decode(e.to_string()))?;

        // The encoder only accepts 8-bit RGB and RGBA buffers.
        let img = if matches!(img, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) {
            img
        } else if img.color().has_alpha() {
            DynamicImage::ImageRgba8(img.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        };

        let encoder = webp::Encoder::from_image(&img)
            .map_err(|e| Error::internal(format!("WebP encoder rejected image: {}", e)))?;

        // libwebp rejects some decodable inputs, e.g. sides over 16383 px.
        let webp = encoder
            .encode_simple(false, self.quality)
            .map_err(|e| Error::internal(format!("WebP encoding failed: {:?}", e)))?;

        Ok(webp.to_vec())
    }

    /// Run [`normalize`](Self::normalize) on the blocking thread pool.
    pub async fn normalize_blocking(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let normalizer = *self;
        tokio::task::spawn_blocking(move || normalizer.normalize(&data))
            .await
            .map_err(|e| Error::internal(format!("Image task failed: {}", e)))?
    }
}
