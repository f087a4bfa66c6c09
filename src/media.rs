use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use thiserror::Error;
use tracing::debug;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("File size exceeds {limit_mb:.1}MB limit")]
    TooLarge { limit_mb: f64 },

    #[error("Invalid file type. Allowed: {}", ALLOWED_EXTENSIONS.join(", "))]
    UnsupportedType,

    #[error("Invalid or corrupted image file")]
    Corrupted,

    #[error("Failed to re-encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    infer::get(data).map(|kind| kind.mime_type().to_string())
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Checks size and extension, then decodes the image once.
pub fn validate_upload(
    bytes: &[u8],
    filename: &str,
    max_bytes: usize,
) -> Result<DynamicImage, MediaError> {
    if bytes.len() > max_bytes {
        return Err(MediaError::TooLarge {
            limit_mb: max_bytes as f64 / (1024.0 * 1024.0),
        });
    }

    match extension_of(filename) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => return Err(MediaError::UnsupportedType),
    }

    image::load_from_memory(bytes).map_err(|err| {
        debug!("Rejected upload {filename}: {err}");
        MediaError::Corrupted
    })
}

/// Downscales so the longer side is at most `max_dimension` and re-encodes as
/// RGB JPEG.
pub fn optimize_for_api(image: DynamicImage, max_dimension: u32) -> Result<Vec<u8>, MediaError> {
    let (width, height) = image.dimensions();
    let image = if width.max(height) > max_dimension {
        debug!("Resizing {width}x{height} upload to fit {max_dimension}px");
        image.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    } else {
        image
    };

    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    Ok(output)
}

pub fn to_data_url(bytes: &[u8]) -> String {
    let mime_type = detect_mime_type(bytes).unwrap_or_else(|| "image/jpeg".to_string());
    let encoded = general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{encoded}")
}

/// Validate, shrink and encode an upload for a vision request.
pub fn prepare_upload(
    bytes: &[u8],
    filename: &str,
    max_bytes: usize,
    max_dimension: u32,
) -> Result<String, MediaError> {
    let image = validate_upload(bytes, filename, max_bytes)?;
    let optimized = optimize_for_api(image, max_dimension)?;
    debug!(
        "Prepared upload {filename}: {} bytes in, {} bytes out",
        bytes.len(),
        optimized.len()
    );
    Ok(to_data_url(&optimized))
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    use std::io::Cursor;

    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_uploads_before_decoding() {
        let err = validate_upload(&[0u8; 2048], "photo.jpg", 1024).unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { .. }));
    }

    #[test]
    fn rejects_unknown_extensions() {
        let png = sample_png(4, 4);
        assert!(matches!(
            validate_upload(&png, "photo.gif", usize::MAX),
            Err(MediaError::UnsupportedType)
        ));
        assert!(matches!(
            validate_upload(&png, "photo", usize::MAX),
            Err(MediaError::UnsupportedType)
        ));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        assert!(matches!(
            validate_upload(b"definitely not a png", "photo.PNG", usize::MAX),
            Err(MediaError::Corrupted)
        ));
    }

    #[test]
    fn large_images_are_shrunk_to_the_limit() {
        let png = sample_png(300, 120);
        let image = validate_upload(&png, "wide.png", usize::MAX).unwrap();
        let jpeg = optimize_for_api(image, 100).unwrap();

        let decoded = image::load_from_memory(&jpeg).unwrap();
        let (width, height) = decoded.dimensions();
        assert_eq!(width, 100);
        assert!(height <= 100);
        assert_eq!(detect_mime_type(&jpeg).as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn small_images_keep_their_size() {
        let png = sample_png(40, 30);
        let image = validate_upload(&png, "small.png", usize::MAX).unwrap();
        let decoded = image::load_from_memory(&optimize_for_api(image, 2048).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn data_url_uses_detected_mime_type() {
        let png = sample_png(2, 2);
        assert!(to_data_url(&png).starts_with("data:image/png;base64,"));
    }
}
