//! Layout guides drawn over preview cards.

use ab_glyph::{Font, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::layout::{LogoBox, QrBox, TextBand};

pub const QR_GUIDE_COLOR: Rgba<u8> = Rgba([230, 40, 40, 255]);
pub const TEXT_GUIDE_COLOR: Rgba<u8> = Rgba([40, 90, 230, 255]);
pub const LOGO_GUIDE_COLOR: Rgba<u8> = Rgba([40, 180, 70, 255]);

/// Outline thickness in pixels.
pub const GUIDE_THICKNESS: i32 = 4;

const CAPTION_SIZE: f32 = 36.0;

/// One outlined region with its caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideBox {
    pub caption: &'static str,
    pub color: Rgba<u8>,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Collect the guide regions for a card of the given width.
///
/// Zero-sized regions are left out.
pub fn guide_boxes(
    canvas_width: u32,
    qr: QrBox,
    band: TextBand,
    logo: Option<LogoBox>,
) -> Vec<GuideBox> {
    let mut boxes = Vec::with_capacity(3);

    if qr.is_drawable() {
        boxes.push(GuideBox {
            caption: "QR",
            color: QR_GUIDE_COLOR,
            x: qr.x1,
            y: qr.y1,
            width: qr.width() as u32,
            height: qr.height() as u32,
        });
    }

    let band_height = band.y_bottom - band.y_top;
    if band_height > 0 && canvas_width > 0 {
        boxes.push(GuideBox {
            caption: "TEXT",
            color: TEXT_GUIDE_COLOR,
            x: 0,
            y: band.y_top,
            width: canvas_width,
            height: band_height as u32,
        });
    }

    if let Some(logo) = logo.filter(|l| l.size > 0) {
        boxes.push(GuideBox {
            caption: "LOGO",
            color: LOGO_GUIDE_COLOR,
            x: logo.x,
            y: logo.y,
            width: logo.size,
            height: logo.size,
        });
    }

    boxes
}

/// Draw outlines and captions for every guide box.
pub fn draw_guides<F: Font>(img: &mut RgbaImage, font: &F, boxes: &[GuideBox]) {
    let scale = PxScale::from(CAPTION_SIZE);

    for guide in boxes {
        for inset in 0..GUIDE_THICKNESS {
            let width = guide.width as i32 - inset * 2;
            let height = guide.height as i32 - inset * 2;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(guide.x + inset, guide.y + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(img, rect, guide.color);
        }

        let caption_y = (guide.y - CAPTION_SIZE as i32 - GUIDE_THICKNESS).max(0);
        draw_text_mut(img, guide.color, guide.x.max(0), caption_y, scale, font, guide.caption);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tests::test_font;

    fn qr_box() -> QrBox {
        QrBox {
            x1: 50,
            y1: 60,
            x2: 150,
            y2: 160,
        }
    }

    fn band() -> TextBand {
        TextBand {
            y_top: 200,
            y_bottom: 260,
        }
    }

    #[test]
    fn collects_all_three_regions() {
        let logo = LogoBox {
            x: 10,
            y: 10,
            size: 30,
        };
        let boxes = guide_boxes(300, qr_box(), band(), Some(logo));
        let captions: Vec<_> = boxes.iter().map(|b| b.caption).collect();
        assert_eq!(captions, ["QR", "TEXT", "LOGO"]);
        assert_eq!(boxes[1].width, 300);
        assert_eq!(boxes[1].height, 60);
    }

    #[test]
    fn skips_degenerate_regions() {
        let empty_qr = QrBox {
            x1: 100,
            y1: 100,
            x2: 100,
            y2: 100,
        };
        let logo = LogoBox { x: 0, y: 0, size: 0 };
        let boxes = guide_boxes(300, empty_qr, band(), Some(logo));
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].caption, "TEXT");
    }

    #[test]
    fn outlines_use_guide_colors() {
        let font = test_font();
        let mut img = RgbaImage::from_pixel(300, 300, Rgba([255, 255, 255, 255]));
        let boxes = guide_boxes(300, qr_box(), band(), None);
        draw_guides(&mut img, &font, &boxes);
        assert_eq!(img.get_pixel(50, 100), &QR_GUIDE_COLOR);
        assert_eq!(img.get_pixel(53, 100), &QR_GUIDE_COLOR);
        assert_eq!(img.get_pixel(100, 110), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(150, 200), &TEXT_GUIDE_COLOR);
    }
}
