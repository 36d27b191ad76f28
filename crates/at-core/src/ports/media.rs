use std::path::Path;

use crate::attachment::MimeType;
use crate::errors::MediaError;
use crate::media::Dimensions;

/// Encoded image payload and metadata.
///
/// 编码后的图像负载与元数据。
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded bytes.
    ///
    /// 编码后的字节数据。
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    ///
    /// 字节数据的 MIME 类型。
    pub mime_type: MimeType,
    /// Size of the encoded image.
    ///
    /// 编码后图像的尺寸。
    pub dimensions: Dimensions,
    /// Size of the source image.
    ///
    /// 原始图像的尺寸。
    pub original: Dimensions,
}

/// Image decoding, scaling and encoding.
///
/// 图像解码、缩放与编码端口。
#[async_trait::async_trait]
pub trait MediaTransformPort: Send + Sync {
    /// Guess the MIME type of a file. `None` when nothing can be detected.
    async fn probe_mime(&self, path: &Path) -> Option<MimeType>;

    /// Shrink the image at `path` so its pixel area is at most `max_pixels`.
    ///
    /// Returns `Ok(None)` when the image is already small enough.
    async fn fit_to_area(
        &self,
        path: &Path,
        max_pixels: u64,
        output: &MimeType,
    ) -> Result<Option<EncodedImage>, MediaError>;

    /// Render a thumbnail of the image at `path` that fits inside `bounds`.
    ///
    /// Returns `Ok(None)` when the image already fits and needs no thumbnail.
    async fn thumbnail(
        &self,
        path: &Path,
        bounds: Dimensions,
        output: &MimeType,
    ) -> Result<Option<EncodedImage>, MediaError>;
}
