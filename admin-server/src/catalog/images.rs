//! Product image processing
//!
//! Uploads are validated, downscaled to fit [`MAX_DIMENSION`] and
//! re-encoded as JPEG before they reach object storage.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::io::Cursor;

use shared::error::{AppError, ErrorCode};

/// Maximum upload size (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Longest side after resizing
pub const MAX_DIMENSION: u32 = 1200;

pub const JPEG_QUALITY: u8 = 85;

pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Object key for a processed product image
pub fn product_image_key(product_id: i64) -> String {
    format!("products/{product_id}/{}.jpg", uuid::Uuid::new_v4())
}

/// Lowercased extension of `filename`, checked against [`SUPPORTED_FORMATS`]
pub fn validate_extension(filename: &str) -> Result<String, AppError> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported format: {ext}. Supported: png, jpg, jpeg, webp"),
        )
        .with_detail("filename", filename));
    }
    Ok(ext)
}

/// Validate, downscale and JPEG-encode one uploaded image
pub fn process_product_image(data: &[u8], filename: &str) -> Result<Vec<u8>, AppError> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile).with_detail("filename", filename));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large: {} bytes (max {})", data.len(), MAX_FILE_SIZE),
        )
        .with_detail("filename", filename));
    }
    validate_extension(filename)?;

    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
            .with_detail("filename", filename)
    })?;

    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(
            ErrorCode::ImageProcessingFailed,
            format!("Image compression failed: {e}"),
        )
    })?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png).unwrap();
        out
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let jpeg = process_product_image(&png(2400, 600), "banner.png").unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 300));
    }

    #[test]
    fn test_small_image_keeps_size() {
        let jpeg = process_product_image(&png(64, 48), "icon.PNG").unwrap();
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            process_product_image(&[], "a.png").unwrap_err().code,
            ErrorCode::EmptyFile
        );
        assert_eq!(
            process_product_image(&png(4, 4), "a.gif").unwrap_err().code,
            ErrorCode::UnsupportedFileFormat
        );
        assert_eq!(
            process_product_image(b"not an image", "a.jpg").unwrap_err().code,
            ErrorCode::InvalidImageFile
        );
    }

    #[test]
    fn test_product_image_key() {
        let key = product_image_key(42);
        assert!(key.starts_with("products/42/"));
        assert!(key.ends_with(".jpg"));
    }
}
