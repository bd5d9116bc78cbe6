//! Label layout and centered, alpha-aware label drawing.

use ab_glyph::{Font, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::compose;

/// Ink bounds of a laid-out string, relative to the drawing origin.
///
/// The origin is the top-left of the line box, with the baseline at the
/// font's ascent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Outlined glyphs of a single line. Measuring and drawing share this layout,
/// so the centered box is exactly the box that gets painted.
struct LaidOutLine {
    glyphs: Vec<OutlinedGlyph>,
    bounds: TextBounds,
}

fn glyph_bounds(glyph: &OutlinedGlyph) -> TextBounds {
    let bb = glyph.px_bounds();
    TextBounds {
        x0: bb.min.x.floor() as i32,
        y0: bb.min.y.floor() as i32,
        x1: bb.max.x.ceil() as i32,
        y1: bb.max.y.ceil() as i32,
    }
}

fn layout_line<F: Font>(font: &F, scale: PxScale, text: &str) -> Option<LaidOutLine> {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;
    let mut glyphs = Vec::new();
    let mut bounds: Option<TextBounds> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            caret += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);

        if let Some(outline) = font.outline_glyph(glyph) {
            let gb = glyph_bounds(&outline);
            bounds = Some(bounds.map_or(gb, |b| b.union(gb)));
            glyphs.push(outline);
        }
    }

    bounds.map(|bounds| LaidOutLine { glyphs, bounds })
}

/// Compute the ink bounds of `text`, or `None` when nothing would be drawn.
pub fn ink_bounds<F: Font>(font: &F, scale: PxScale, text: &str) -> Option<TextBounds> {
    layout_line(font, scale, text).map(|line| line.bounds)
}

/// Draw `text` with its ink box centered on `(center_x, center_y)`.
///
/// Glyph coverage is blended with the color's alpha, so translucent colors
/// stay translucent. When `background` is given, a rectangle padded by
/// `padding` pixels is filled behind the text first. Returns the ink box in
/// canvas coordinates, or `None` for text without visible glyphs.
#[allow(clippy::too_many_arguments)]
pub fn draw_centered_label<F: Font>(
    img: &mut RgbaImage,
    font: &F,
    scale: PxScale,
    center_x: i32,
    center_y: i32,
    text: &str,
    color: Rgba<u8>,
    background: Option<(Rgba<u8>, i32)>,
) -> Option<TextBounds> {
    let line = layout_line(font, scale, text)?;
    let bounds = line.bounds;
    let placed = bounds.offset(
        center_x - (bounds.x0 + bounds.x1) / 2,
        center_y - (bounds.y0 + bounds.y1) / 2,
    );

    if let Some((fill, padding)) = background {
        compose::fill_rect(
            img,
            placed.x0 - padding,
            placed.y0 - padding,
            placed.x1 + padding,
            placed.y1 + padding,
            fill,
        );
    }

    // Overlapping glyph edges keep the strongest coverage instead of
    // blending twice.
    let width = bounds.width() as usize;
    let mut coverage = vec![0.0f32; width * bounds.height() as usize];
    for glyph in &line.glyphs {
        let gb = glyph_bounds(glyph);
        let (gx, gy) = ((gb.x0 - bounds.x0) as u32, (gb.y0 - bounds.y0) as u32);
        glyph.draw(|x, y, c| {
            let idx = (gy + y) as usize * width + (gx + x) as usize;
            if let Some(cell) = coverage.get_mut(idx) {
                *cell = cell.max(c);
            }
        });
    }

    for (idx, &c) in coverage.iter().enumerate() {
        if c > 0.0 {
            let x = placed.x0 + (idx % width) as i32;
            let y = placed.y0 + (idx / width) as i32;
            compose::blend_at(img, x, y, color, c);
        }
    }

    Some(placed)
}
