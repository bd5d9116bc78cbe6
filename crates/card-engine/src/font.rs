//! Font loading: uploaded font data, a configured file or the bundled default.

use std::path::Path;

use ab_glyph::FontArc;

use crate::error::CardError;

/// DejaVu Sans Bold, shipped so rendering never depends on installed fonts.
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

/// Parse TTF/OTF font data.
pub fn load_font(data: Vec<u8>) -> Result<FontArc, CardError> {
    FontArc::try_from_vec(data).map_err(|_| CardError::Font)
}

/// The font compiled into the binary.
pub fn bundled_font() -> Result<FontArc, CardError> {
    FontArc::try_from_slice(BUNDLED_FONT).map_err(|_| CardError::Font)
}

/// Load the fallback font: `configured` when it is readable, otherwise the
/// bundled one.
pub fn load_default_font(configured: Option<&Path>) -> Result<FontArc, CardError> {
    if let Some(path) = configured {
        match std::fs::read(path) {
            Ok(data) => {
                tracing::info!(path = %path.display(), "Using configured default font");
                return load_font(data);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Configured font unreadable: {e}");
            }
        }
    }

    tracing::debug!("Using bundled font");
    bundled_font()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font;

    #[test]
    fn garbage_font_data_is_rejected() {
        let err = load_font(b"definitely not a font".to_vec()).unwrap_err();
        assert!(matches!(err, CardError::Font));
    }

    #[test]
    fn bundled_font_has_label_glyphs() {
        let font = bundled_font().unwrap();
        for ch in "Room 1101-AB".chars() {
            assert_ne!(font.glyph_id(ch).0, 0, "missing glyph for {ch:?}");
        }
    }

    #[test]
    fn unreadable_configured_font_falls_back_to_bundled() {
        let missing = Path::new("/nonexistent/font.ttf");
        let font = load_default_font(Some(missing)).unwrap();
        assert_ne!(font.glyph_id('A').0, 0);
        assert!(load_default_font(None).is_ok());
    }
}
