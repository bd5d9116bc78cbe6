//! CSV record source.

use std::io::Read;

use card_engine::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::BatchError;

/// Header names of the three required columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordColumns {
    pub id: String,
    pub text: String,
    pub url: String,
}

impl Default for RecordColumns {
    fn default() -> Self {
        Self {
            id: "ID".into(),
            text: "Text".into(),
            url: "URL".into(),
        }
    }
}

impl RecordColumns {
    /// Parse `"ID,Text,URL"` style column lists.
    pub fn from_list(list: &str) -> Option<Self> {
        let parts: Vec<&str> = list.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [id, text, url] if !id.is_empty() && !text.is_empty() && !url.is_empty() => {
                Some(Self {
                    id: (*id).into(),
                    text: (*text).into(),
                    url: (*url).into(),
                })
            }
            _ => None,
        }
    }
}

/// Read every data row of a CSV table into records.
///
/// Column names are matched exactly after trimming. Short rows produce empty
/// cells, which fail later per record rather than aborting the read.
pub fn read_records<R: Read>(
    reader: R,
    columns: &RecordColumns,
) -> Result<Vec<Record>, BatchError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| BatchError::MissingColumn(name.to_string()))
    };
    let id_idx = find(&columns.id)?;
    let text_idx = find(&columns.text)?;
    let url_idx = find(&columns.url)?;
    debug!(id_idx, text_idx, url_idx, "Resolved CSV columns");

    let mut records = Vec::new();
    for (i, row) in csv.records().enumerate() {
        let row = row?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").to_string();
        records.push(Record::new(i + 1, cell(id_idx), cell(text_idx), cell(url_idx)));
    }

    if records.is_empty() {
        return Err(BatchError::EmptyTable);
    }

    info!(count = records.len(), "Loaded records from CSV");
    Ok(records)
}
