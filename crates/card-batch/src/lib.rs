//! Batch generation of QR cards.
//!
//! Reads records from CSV, drives the card composer over every record,
//! packs the results into a ZIP archive and renders single-card previews.

pub mod archive;
pub mod batch;
pub mod preview;
pub mod records;

pub use archive::{CardArchive, NameClash};
pub use batch::{BatchOutput, BatchProgress, BatchReport, RecordFailure, run_batch};
pub use preview::{PreviewMode, PreviewOutput, render_preview};
pub use records::{RecordColumns, read_records};

/// Number of failure messages shown in a batch summary.
pub const SUMMARY_FAILURE_LIMIT: usize = 5;

/// File name offered for the generated archive.
pub const ARCHIVE_FILE_NAME: &str = "qr_cards.zip";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("CSV has no data rows")]
    EmptyTable,
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
    #[error("no records to preview")]
    NoRecords,
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Card(#[from] card_engine::CardError),
}

#[cfg(test)]
mod tests;
