//! Image resizing utilities for templates and logos.
//!
//! Both operations resize to exact dimensions with bicubic (Catmull-Rom)
//! filtering.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Resize a template to the canonical card resolution.
///
/// Returns the original image unchanged if it already matches.
pub fn normalize_resolution(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if (orig_w, orig_h) == (width, height) {
        debug!(width, height, "Template already at canonical size, skipping resize");
        return img.clone();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Normalizing template resolution"
    );

    img.resize_exact(width.max(1), height.max(1), FilterType::CatmullRom)
}

/// Resize an image to a `size` x `size` square, ignoring its aspect ratio.
pub fn resize_square(img: &DynamicImage, size: u32) -> DynamicImage {
    let size = size.max(1);
    if img.width() == size && img.height() == size {
        return img.clone();
    }
    img.resize_exact(size, size, FilterType::CatmullRom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Create a test DynamicImage with given dimensions.
    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let gray = GrayImage::from_pixel(width, height, Luma([128]));
        DynamicImage::ImageLuma8(gray)
    }

    #[test]
    fn test_normalize_upscale() {
        let img = create_test_image(40, 30);
        let result = normalize_resolution(&img, 227, 320);
        assert_eq!((result.width(), result.height()), (227, 320));
    }

    #[test]
    fn test_normalize_downscale_ignores_aspect_ratio() {
        let img = create_test_image(800, 200);
        let result = normalize_resolution(&img, 100, 100);
        assert_eq!((result.width(), result.height()), (100, 100));
    }

    #[test]
    fn test_normalize_same_size_is_identity() {
        let img = create_test_image(64, 48);
        let result = normalize_resolution(&img, 64, 48);
        assert_eq!(result.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_resize_square() {
        let img = create_test_image(300, 120);
        let result = resize_square(&img, 50);
        assert_eq!((result.width(), result.height()), (50, 50));
    }

    #[test]
    fn test_resize_square_zero_size_keeps_one_pixel() {
        let img = create_test_image(10, 10);
        let result = resize_square(&img, 0);
        assert_eq!((result.width(), result.height()), (1, 1));
    }
}
