//! Image composition utilities: canvases, alpha overlays and filled areas.

use image::{DynamicImage, Rgba, RgbaImage};

/// Copy an image onto a fully opaque RGBA canvas, dropping any alpha channel.
pub fn opaque_canvas(img: &DynamicImage) -> RgbaImage {
    DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8()
}

/// Overlay `top` image onto `base` at the given position.
///
/// The `top` image is alpha-composited over the base. Pixels falling outside
/// the base, including negative offsets, are clipped.
pub fn overlay(base: &mut RgbaImage, top: &DynamicImage, x: i32, y: i32) {
    let top_rgba = top.to_rgba8();
    for (dx, dy, pixel) in top_rgba.enumerate_pixels() {
        let Some((target_x, target_y)) = target(base, x + dx as i32, y + dy as i32) else {
            continue;
        };
        let alpha = pixel[3] as f32 / 255.0;
        if alpha > 0.99 {
            base.put_pixel(target_x, target_y, Rgba([pixel[0], pixel[1], pixel[2], 255]));
        } else if alpha > 0.01 {
            let bg = base.get_pixel(target_x, target_y);
            let blended = blend_pixel(bg, pixel, alpha);
            base.put_pixel(target_x, target_y, blended);
        }
    }
}

/// Fill the half-open rectangle `[x0, x1) x [y0, y1)` with `color`,
/// blending by the color's alpha.
pub fn fill_rect(base: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let alpha = color[3] as f32 / 255.0;
    if alpha <= 0.01 {
        return;
    }
    let x0 = x0.clamp(0, base.width() as i32);
    let x1 = x1.clamp(0, base.width() as i32);
    let y0 = y0.clamp(0, base.height() as i32);
    let y1 = y1.clamp(0, base.height() as i32);

    for py in y0..y1 {
        for px in x0..x1 {
            let (px, py) = (px as u32, py as u32);
            if alpha > 0.99 {
                base.put_pixel(px, py, Rgba([color[0], color[1], color[2], 255]));
            } else {
                let blended = blend_pixel(base.get_pixel(px, py), &color, alpha);
                base.put_pixel(px, py, blended);
            }
        }
    }
}

/// Blend `color` into one pixel, weighted by `coverage` and the color's alpha.
/// Out-of-bounds positions are ignored.
pub fn blend_at(base: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    let Some((x, y)) = target(base, x, y) else {
        return;
    };
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    if alpha > 0.99 {
        base.put_pixel(x, y, Rgba([color[0], color[1], color[2], 255]));
    } else if alpha > 0.0 {
        let blended = blend_pixel(base.get_pixel(x, y), &color, alpha);
        base.put_pixel(x, y, blended);
    }
}

fn target(base: &RgbaImage, x: i32, y: i32) -> Option<(u32, u32)> {
    if x < 0 || y < 0 {
        return None;
    }
    let (x, y) = (x as u32, y as u32);
    (x < base.width() && y < base.height()).then_some((x, y))
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let inv = 1.0 - alpha;
    Rgba([
        (fg[0] as f32 * alpha + bg[0] as f32 * inv) as u8,
        (fg[1] as f32 * alpha + bg[1] as f32 * inv) as u8,
        (fg[2] as f32 * alpha + bg[2] as f32 * inv) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_canvas_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0])));
        let canvas = opaque_canvas(&img);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn overlay_does_not_panic_on_out_of_bounds() {
        let mut base = RgbaImage::new(100, 100);
        let top = DynamicImage::ImageRgba8(RgbaImage::new(50, 50));
        overlay(&mut base, &top, 80, 80); // partially out of bounds
        overlay(&mut base, &top, -30, -30);
    }

    #[test]
    fn overlay_respects_alpha() {
        let mut base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let mut top = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 0]));
        top.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        overlay(&mut base, &DynamicImage::ImageRgba8(top), 3, 3);
        assert_eq!(base.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(base.get_pixel(4, 3), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn overlay_negative_offset_clips_leading_pixels() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let top = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255])));
        overlay(&mut base, &top, -1, -1);
        assert_eq!(base.get_pixel(1, 1), &Rgba([9, 9, 9, 255]));
        assert_eq!(base.get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn fill_rect_clamps_and_blends() {
        let mut base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        fill_rect(&mut base, -5, -5, 3, 3, Rgba([200, 100, 50, 255]));
        assert_eq!(base.get_pixel(2, 2), &Rgba([200, 100, 50, 255]));
        assert_eq!(base.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));

        fill_rect(&mut base, 5, 5, 6, 6, Rgba([255, 255, 255, 128]));
        let blended = base.get_pixel(5, 5);
        assert!(blended[0] > 100 && blended[0] < 150);
    }

    #[test]
    fn blend_at_weights_coverage_by_alpha() {
        let mut base = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        blend_at(&mut base, 1, 1, Rgba([255, 255, 255, 255]), 1.0);
        blend_at(&mut base, 2, 2, Rgba([255, 255, 255, 64]), 1.0);
        blend_at(&mut base, 3, 3, Rgba([255, 255, 255, 255]), 0.0);
        blend_at(&mut base, -1, 9, Rgba([255, 255, 255, 255]), 1.0);
        assert_eq!(base.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
        assert!((63..=64).contains(&base.get_pixel(2, 2)[0]));
        assert_eq!(base.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
    }
}
