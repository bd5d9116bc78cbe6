//! In-memory ZIP archive of rendered cards.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use image::{ImageFormat, RgbImage};
use tracing::warn;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::BatchError;

/// Archive entry name for a record identifier.
///
/// Path separators are replaced so every card lands at the archive root.
pub fn entry_name(id: &str) -> String {
    let safe: String = id
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.png")
}

/// Encode a card as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// A different identifier already owns the entry name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("archive entry '{name}' already holds record '{existing_id}'")]
pub struct NameClash {
    pub name: String,
    pub existing_id: String,
}

struct Entry {
    id: String,
    name: String,
    png: Vec<u8>,
}

/// Collects PNG entries and writes them into a ZIP on [`CardArchive::finish`].
///
/// Adding an identifier twice replaces the earlier entry in place. Distinct
/// identifiers that sanitize to the same entry name are rejected.
#[derive(Default)]
pub struct CardArchive {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl CardArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add encoded PNG bytes under `<id>.png`.
    pub fn add_png(&mut self, id: &str, png: Vec<u8>) -> Result<(), NameClash> {
        let id = id.trim();
        let name = entry_name(id);
        if let Some(&pos) = self.index.get(&name) {
            let entry = &mut self.entries[pos];
            if entry.id != id {
                warn!(entry = %name, id, existing = %entry.id, "Identifiers clash on archive entry name");
                return Err(NameClash {
                    name,
                    existing_id: entry.id.clone(),
                });
            }
            warn!(entry = %name, "Duplicate identifier, replacing earlier card");
            entry.png = png;
            return Ok(());
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(Entry {
            id: id.to_string(),
            name,
            png,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all entries into a ZIP archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>, BatchError> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for entry in self.entries {
            zip.start_file(entry.name, options)?;
            zip.write_all(&entry.png).map_err(zip::result::ZipError::Io)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}
