//! Image sizing rules and MIME constants shared by the transfer use cases.
//!
//! Only arithmetic lives here; decoding and encoding sit behind
//! [`crate::ports::MediaTransformPort`].

use serde::{Deserialize, Serialize};

use crate::attachment::MimeType;

/// Bounding box for generated previews.
pub const THUMBNAIL_BOUNDS: Dimensions = Dimensions::new(300, 200);
/// Encoding used for generated previews.
pub const THUMBNAIL_MIME: &str = "image/jpeg";
/// Encoding used when an image is shrunk before upload.
pub const RESIZED_IMAGE_MIME: &str = "image/jpeg";
/// Type announced for encrypted payloads.
pub const ENCRYPTED_MIME: &str = "application/octet-stream";
/// Largest attachment accepted for sending.
pub const MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn fits_within(&self, bounds: Dimensions) -> bool {
        self.width <= bounds.width && self.height <= bounds.height
    }
}

/// Largest size with the same aspect ratio whose pixel area is `<= max_pixels`.
///
/// Returns `dims` unchanged when it is already small enough or `max_pixels` is 0.
pub fn scale_to_area(dims: Dimensions, max_pixels: u64) -> Dimensions {
    if max_pixels == 0 || dims.area() <= max_pixels {
        return dims;
    }

    let scale = (max_pixels as f64 / dims.area() as f64).sqrt();
    let mut width = ((dims.width as f64) * scale).floor().max(1.0) as u32;
    let mut height = ((dims.height as f64) * scale).floor().max(1.0) as u32;

    // Float rounding can overshoot by a pixel row.
    while u64::from(width) * u64::from(height) > max_pixels {
        if width >= height && width > 1 {
            width -= 1;
        } else if height > 1 {
            height -= 1;
        } else {
            break;
        }
    }

    Dimensions::new(width, height)
}

/// Largest size with the same aspect ratio that fits inside `bounds`.
///
/// Never upscales.
pub fn scale_to_fit(dims: Dimensions, bounds: Dimensions) -> Dimensions {
    if dims.fits_within(bounds) || dims.width == 0 || dims.height == 0 {
        return dims;
    }

    let ratio = f64::min(
        bounds.width as f64 / dims.width as f64,
        bounds.height as f64 / dims.height as f64,
    );
    let width = ((dims.width as f64) * ratio).round() as u32;
    let height = ((dims.height as f64) * ratio).round() as u32;

    Dimensions::new(width.clamp(1, bounds.width), height.clamp(1, bounds.height))
}

/// File extension used when writing data of the given type.
pub fn extension_for_mime(mime: &MimeType) -> String {
    match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg".to_string(),
        "image/svg+xml" => "svg".to_string(),
        "application/octet-stream" | "" => "dat".to_string(),
        _ => match mime.subtype() {
            Some(sub) => sub.trim_start_matches("x-").to_string(),
            None => "dat".to_string(),
        },
    }
}
