//! Batch driver: every record through the composer into one archive.

use card_engine::{Composer, Guides, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::archive::{self, CardArchive};
use crate::{BatchError, SUMMARY_FAILURE_LIMIT};

/// Progress after one record has been processed.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    pub done: usize,
    pub total: usize,
    pub id: &'a str,
    pub ok: bool,
}

/// A record that could not be turned into a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub row: usize,
    pub id: String,
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Archive entries actually written (duplicates collapse into one).
    pub entries: usize,
    pub failures: Vec<RecordFailure>,
    pub generated_at: DateTime<Utc>,
}

impl BatchReport {
    /// Human-readable summary: the success count, then at most
    /// [`SUMMARY_FAILURE_LIMIT`] failure messages and a remainder count.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Generated {} of {} cards",
            self.succeeded, self.total
        )];
        if self.failures.is_empty() {
            return lines;
        }

        lines.push(format!("{} records failed:", self.failed));
        lines.extend(
            self.failures
                .iter()
                .take(SUMMARY_FAILURE_LIMIT)
                .map(|f| format!("  row {} ({}): {}", f.row, f.id, f.message)),
        );
        let rest = self.failures.len().saturating_sub(SUMMARY_FAILURE_LIMIT);
        if rest > 0 {
            lines.push(format!("  ...and {rest} more"));
        }
        lines
    }
}

/// Archive bytes plus the report describing them.
#[derive(Debug)]
pub struct BatchOutput {
    pub archive: Vec<u8>,
    pub report: BatchReport,
}

/// Compose every record without guides and pack the PNGs into a ZIP.
///
/// Per-record failures are collected in the report; only archive write
/// errors abort the run.
pub fn run_batch<F>(
    composer: &Composer,
    records: &[Record],
    mut on_progress: F,
) -> Result<BatchOutput, BatchError>
where
    F: FnMut(BatchProgress<'_>),
{
    let total = records.len();
    let mut archive = CardArchive::new();
    let mut failures = Vec::new();
    let mut succeeded = 0usize;

    for (i, record) in records.iter().enumerate() {
        let result = composer
            .compose(record, Guides::Hide)
            .map_err(|e| e.to_string())
            .and_then(|card| {
                archive::encode_png(&card)
                    .map_err(|e| format!("failed to encode card '{}': {e}", record.id))
            });

        let result = result.and_then(|png| {
            archive
                .add_png(&record.id, png)
                .map_err(|clash| clash.to_string())
        });

        let ok = match result {
            Ok(()) => {
                succeeded += 1;
                true
            }
            Err(message) => {
                warn!(row = record.row, id = %record.id, "Card generation failed: {message}");
                failures.push(RecordFailure {
                    row: record.row,
                    id: record.id.clone(),
                    message,
                });
                false
            }
        };

        on_progress(BatchProgress {
            done: i + 1,
            total,
            id: &record.id,
            ok,
        });
    }

    let entries = archive.len();
    let archive = archive.finish()?;
    let report = BatchReport {
        total,
        succeeded,
        failed: failures.len(),
        entries,
        failures,
        generated_at: Utc::now(),
    };

    info!(
        total,
        succeeded,
        failed = report.failed,
        bytes = archive.len(),
        "Batch finished"
    );

    Ok(BatchOutput { archive, report })
}
