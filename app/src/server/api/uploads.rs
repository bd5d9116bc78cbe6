//! Multipart parsing for card job uploads.

use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::Field;
use axum::http::StatusCode;
use card_batch::RecordColumns;
use serde_json::Value;

use crate::services::cards::JobInputs;
use crate::services::font::FontUpload;

use super::err_json;

type UploadResult<T> = Result<T, (StatusCode, Json<Value>)>;

/// Collect job inputs from multipart fields.
///
/// Fields: `template`, `csv`, `font`, `logo` (files), `layout` (JSON) and
/// `columns` (JSON object or `ID,Text,URL` list). Empty file fields count
/// as not uploaded.
pub async fn read_job_inputs(mut multipart: Multipart) -> UploadResult<JobInputs> {
    let mut inputs = JobInputs::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| err_json(400, &e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "template" => inputs.template = non_empty(read_bytes(field).await?),
            "csv" => inputs.csv = non_empty(read_bytes(field).await?),
            "logo" => inputs.logo = non_empty(read_bytes(field).await?),
            "font" => {
                let filename = field.file_name().map(str::to_string);
                inputs.font = non_empty(read_bytes(field).await?)
                    .map(|data| FontUpload { filename, data });
            }
            "layout" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    inputs.layout = serde_json::from_str(&text)
                        .map_err(|e| err_json(400, &format!("invalid layout JSON: {e}")))?;
                }
            }
            "columns" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    inputs.columns = parse_columns(&text)
                        .ok_or_else(|| err_json(400, "invalid columns (expected ID,Text,URL)"))?;
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown upload field"),
        }
    }

    Ok(inputs)
}

/// Parse column names given either as JSON or as a comma separated list.
pub fn parse_columns(text: &str) -> Option<RecordColumns> {
    let text = text.trim();
    if text.starts_with('{') {
        serde_json::from_str(text).ok()
    } else {
        RecordColumns::from_list(text)
    }
}

async fn read_bytes(field: Field<'_>) -> UploadResult<Vec<u8>> {
    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| err_json(400, &e.to_string()))
}

async fn read_text(field: Field<'_>) -> UploadResult<String> {
    field.text().await.map_err(|e| err_json(400, &e.to_string()))
}

fn non_empty(data: Vec<u8>) -> Option<Vec<u8>> {
    (!data.is_empty()).then_some(data)
}
