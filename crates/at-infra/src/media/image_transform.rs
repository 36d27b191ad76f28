use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use async_trait::async_trait;
use at_core::media::{scale_to_area, scale_to_fit, Dimensions};
use at_core::ports::{EncodedImage, MediaTransformPort};
use at_core::{MediaError, MimeType};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat, ImageReader};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Bytes read from the head of a file for content sniffing.
const SNIFF_LEN: usize = 64;
const JPEG_QUALITY: u8 = 85;

/// Media transform backed by the `image` crate.
///
/// Decoding and encoding run on the blocking pool.
#[derive(Debug, Default, Clone)]
pub struct ImageMediaTransform;

impl ImageMediaTransform {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaTransformPort for ImageMediaTransform {
    async fn probe_mime(&self, path: &Path) -> Option<MimeType> {
        let mut file = tokio::fs::File::open(path).await.ok()?;
        let mut head = [0u8; SNIFF_LEN];
        let read = file.read(&mut head).await.ok()?;

        if let Some(mime) = image::guess_format(&head[..read]).ok().and_then(format_mime) {
            return Some(MimeType::from(mime));
        }
        mime_guess::from_path(path)
            .first()
            .map(|mime| MimeType::from(mime.essence_str()))
    }

    async fn fit_to_area(
        &self,
        path: &Path,
        max_pixels: u64,
        output: &MimeType,
    ) -> Result<Option<EncodedImage>, MediaError> {
        let path = path.to_path_buf();
        let output = output.clone();
        run_blocking(move || {
            let original = read_dimensions(&path)?;
            if original.area() <= max_pixels {
                return Ok(None);
            }
            let target = scale_to_area(original, max_pixels);
            debug!(?original, ?target, "Shrinking image to pixel limit");
            resize_and_encode(&path, original, target, &output).map(Some)
        })
        .await
    }

    async fn thumbnail(
        &self,
        path: &Path,
        bounds: Dimensions,
        output: &MimeType,
    ) -> Result<Option<EncodedImage>, MediaError> {
        let path = path.to_path_buf();
        let output = output.clone();
        run_blocking(move || {
            let original = read_dimensions(&path)?;
            if original.fits_within(bounds) {
                return Ok(None);
            }
            let target = scale_to_fit(original, bounds);
            resize_and_encode(&path, original, target, &output).map(Some)
        })
        .await
    }
}

async fn run_blocking<F>(job: F) -> Result<Option<EncodedImage>, MediaError>
where
    F: FnOnce() -> Result<Option<EncodedImage>, MediaError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| MediaError::Aborted(err.to_string()))?
}

/// Reader whose format is sniffed from the content; the extension is only a
/// fallback. Downloads are often stored under extension-less names.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, MediaError> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| MediaError::Decode(err.to_string()))
}

fn read_dimensions(path: &Path) -> Result<Dimensions, MediaError> {
    let (width, height) = open_reader(path)?
        .into_dimensions()
        .map_err(|err| MediaError::Decode(err.to_string()))?;
    Ok(Dimensions::new(width, height))
}

fn resize_and_encode(
    path: &Path,
    original: Dimensions,
    target: Dimensions,
    output: &MimeType,
) -> Result<EncodedImage, MediaError> {
    let decoded = open_reader(path)?
        .decode()
        .map_err(|err| MediaError::Decode(err.to_string()))?;
    let resized = decoded.resize_exact(target.width, target.height, FilterType::Triangle);
    let bytes = encode(&resized, output)?;
    Ok(EncodedImage {
        bytes,
        mime_type: output.clone(),
        dimensions: Dimensions::new(resized.width(), resized.height()),
        original,
    })
}

fn encode(image: &DynamicImage, output: &MimeType) -> Result<Vec<u8>, MediaError> {
    let encode_err = |err: image::ImageError| MediaError::Encode {
        mime: output.to_string(),
        reason: err.to_string(),
    };

    let mut bytes = Vec::new();
    match output.as_str() {
        "image/jpeg" => {
            // JPEG has no alpha channel.
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(encode_err)?;
        }
        "image/png" => {
            image
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(encode_err)?;
        }
        "image/webp" => {
            let rgba = image.to_rgba8();
            WebPEncoder::new_lossless(&mut bytes)
                .encode(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(encode_err)?;
        }
        other => {
            return Err(MediaError::Encode {
                mime: other.to_string(),
                reason: "unsupported output format".to_string(),
            })
        }
    }
    Ok(bytes)
}

fn format_mime(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        ImageFormat::Ico => Some("image/x-icon"),
        _ => None,
    }
}
