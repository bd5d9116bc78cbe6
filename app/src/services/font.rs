//! Font resolution service: uploaded font or the configured/bundled default.

use std::path::Path;

use ab_glyph::FontArc;
use card_engine::CardError;

const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024; // 50MB
const VALID_EXTENSIONS: &[&str] = &[".ttf", ".otf"];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Invalid font format (only TTF/OTF supported)")]
    InvalidFormat,
    #[error("Font file too large (max 50MB)")]
    FileTooLarge,
    #[error(transparent)]
    Card(#[from] CardError),
}

/// A font supplied with a job.
#[derive(Debug, Clone)]
pub struct FontUpload {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

impl FontUpload {
    /// Check size and, when a file name is known, its extension.
    pub fn validate(&self) -> Result<(), FontError> {
        if self.data.len() as u64 > MAX_FONT_SIZE {
            return Err(FontError::FileTooLarge);
        }

        if let Some(filename) = &self.filename {
            let ext = Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e.to_lowercase()))
                .unwrap_or_default();

            if !VALID_EXTENSIONS.contains(&ext.as_str()) {
                return Err(FontError::InvalidFormat);
            }
        }
        Ok(())
    }
}

/// Load the uploaded font, or the default one when nothing was uploaded.
pub fn resolve_font(
    upload: Option<FontUpload>,
    default_path: Option<&Path>,
) -> Result<FontArc, FontError> {
    match upload {
        Some(upload) => {
            upload.validate()?;
            let font = card_engine::load_font(upload.data)?;
            tracing::info!(filename = ?upload.filename, "Using uploaded font");
            Ok(font)
        }
        None => Ok(card_engine::load_default_font(default_path)?),
    }
}
