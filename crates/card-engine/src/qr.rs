//! QR code generation for card images.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;

/// Light modules surrounding the symbol, as required by the QR standard.
pub const QUIET_ZONE: u32 = 4;

/// Generate a QR code image from a URL or text string.
///
/// Returns a grayscale image of exactly `width` x `height` pixels. Scaling
/// uses nearest-neighbour filtering so module edges stay sharp.
pub fn generate_qr(data: &str, width: u32, height: u32) -> Result<DynamicImage, String> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| format!("QR encode error: {e}"))?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let img_size = module_count + QUIET_ZONE * 2;

    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;

        if *color == qrcode::Color::Dark {
            img.put_pixel(x + QUIET_ZONE, y + QUIET_ZONE, Luma([0u8]));
        }
    }

    let qr = DynamicImage::ImageLuma8(img);
    Ok(qr.resize_exact(width.max(1), height.max(1), FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_qr_matches_requested_size() {
        let img = generate_qr("https://example.com", 200, 200).unwrap();
        assert_eq!((img.width(), img.height()), (200, 200));
    }

    #[test]
    fn generate_qr_stretches_to_non_square_box() {
        let img = generate_qr("https://example.com/1101", 300, 150).unwrap();
        assert_eq!((img.width(), img.height()), (300, 150));
    }

    #[test]
    fn generate_qr_has_light_border_and_dark_modules() {
        let img = generate_qr("https://example.com", 290, 290).unwrap().to_luma8();
        assert_eq!(img.get_pixel(0, 0), &Luma([255]));
        assert_eq!(img.get_pixel(289, 289), &Luma([255]));
        assert!(img.pixels().any(|p| p.0[0] == 0));
    }

    #[test]
    fn generate_qr_rejects_oversized_payload() {
        let data = "x".repeat(8000);
        assert!(generate_qr(&data, 100, 100).is_err());
    }
}
