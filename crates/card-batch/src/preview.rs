//! Single-card previews.

use std::fmt;
use std::str::FromStr;

use card_engine::{Composer, Guides, Record};
use image::RgbImage;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BatchError;

/// Which card a preview shows, and whether guides are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// First record; guides follow the layout's `show_guides` flag.
    #[default]
    Auto,
    /// First record without guides.
    First,
    /// A uniformly sampled record without guides.
    Random,
    /// First record with guides forced on.
    Guides,
}

impl PreviewMode {
    fn guides(self, show_guides: bool) -> Guides {
        match self {
            PreviewMode::Guides => Guides::Show,
            PreviewMode::Auto if show_guides => Guides::Show,
            _ => Guides::Hide,
        }
    }
}

impl FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(PreviewMode::Auto),
            "first" => Ok(PreviewMode::First),
            "random" => Ok(PreviewMode::Random),
            "guides" => Ok(PreviewMode::Guides),
            other => Err(format!(
                "unknown preview mode '{other}' (expected auto, first, random or guides)"
            )),
        }
    }
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreviewMode::Auto => "auto",
            PreviewMode::First => "first",
            PreviewMode::Random => "random",
            PreviewMode::Guides => "guides",
        };
        f.write_str(name)
    }
}

/// A rendered preview and the record it shows.
#[derive(Debug)]
pub struct PreviewOutput {
    pub record_id: String,
    pub guides: Guides,
    pub image: RgbImage,
}

/// Pick the record a preview mode shows.
pub fn select_record<'a, R: Rng + ?Sized>(
    records: &'a [Record],
    mode: PreviewMode,
    rng: &mut R,
) -> Option<&'a Record> {
    match mode {
        PreviewMode::Random => records.choose(rng),
        PreviewMode::Auto | PreviewMode::First | PreviewMode::Guides => records.first(),
    }
}

/// Render one preview card.
pub fn render_preview<R: Rng + ?Sized>(
    composer: &Composer,
    records: &[Record],
    mode: PreviewMode,
    rng: &mut R,
) -> Result<PreviewOutput, BatchError> {
    let record = select_record(records, mode, rng).ok_or(BatchError::NoRecords)?;
    let guides = mode.guides(composer.layout().show_guides);
    debug!(%mode, id = %record.id, ?guides, "Rendering preview");

    let image = composer.compose(record, guides)?;
    Ok(PreviewOutput {
        record_id: record.id.clone(),
        guides,
        image,
    })
}
