//! Card preview and generation API.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use card_batch::{ARCHIVE_FILE_NAME, PreviewMode, archive::encode_png};
use card_engine::LayoutConfig;
use serde::Deserialize;
use serde_json::{Value, json};

use super::err_json;
use super::uploads::read_job_inputs;
use crate::app::SharedState;
use crate::services::cards::{CardJob, JobError};

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

/// Header carrying the ID of the previewed record.
pub const CARD_ID_HEADER: &str = "x-card-id";

/// Headers carrying batch counts on archive downloads.
pub const SUCCEEDED_HEADER: &str = "x-cards-succeeded";
pub const FAILED_HEADER: &str = "x-cards-failed";

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub mode: Option<PreviewMode>,
}

/// Response shape of `/api/generate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateFormat {
    /// Report plus base64 archive.
    #[default]
    Json,
    /// The archive itself as a download.
    Zip,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub format: Option<GenerateFormat>,
}

/// GET /api/layout/default
pub async fn default_layout() -> Json<LayoutConfig> {
    Json(LayoutConfig::default())
}

/// POST /api/preview?mode=auto|first|random|guides
pub async fn preview(
    State(state): State<SharedState>,
    Query(query): Query<PreviewQuery>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let inputs = read_job_inputs(multipart).await?;
    let config = state.config().clone();
    let mode = query.mode.unwrap_or_default();

    let (record_id, png) = tokio::task::spawn_blocking(move || {
        let job = CardJob::load(inputs, &config)?;
        let output = job.preview(mode)?;
        let png = encode_png(&output.image).map_err(|source| {
            card_engine::CardError::Image {
                what: "preview",
                source,
            }
        })?;
        Ok::<_, JobError>((output.record_id, png))
    })
    .await
    .map_err(|e| err_json(500, &format!("preview task failed: {e}")))?
    .map_err(job_error)?;

    let mut response = (StatusCode::OK, png).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    match HeaderValue::from_str(&record_id) {
        Ok(value) => {
            headers.insert(CARD_ID_HEADER, value);
        }
        Err(_) => tracing::debug!(id = %record_id, "Card ID not representable as a header"),
    }
    Ok(response)
}

/// POST /api/generate?format=json|zip
pub async fn generate(
    State(state): State<SharedState>,
    Query(query): Query<GenerateQuery>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let inputs = read_job_inputs(multipart).await?;
    let config = state.config().clone();

    let output = tokio::task::spawn_blocking(move || CardJob::load(inputs, &config)?.generate())
        .await
        .map_err(|e| err_json(500, &format!("generate task failed: {e}")))?
        .map_err(job_error)?;

    tracing::info!(
        succeeded = output.report.succeeded,
        failed = output.report.failed,
        bytes = output.archive.len(),
        "Batch generated"
    );

    if query.format.unwrap_or_default() == GenerateFormat::Zip {
        let disposition = format!("attachment; filename=\"{ARCHIVE_FILE_NAME}\"");
        let mut response = (StatusCode::OK, output.archive).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
        headers.insert(SUCCEEDED_HEADER, HeaderValue::from(output.report.succeeded));
        headers.insert(FAILED_HEADER, HeaderValue::from(output.report.failed));
        return Ok(response);
    }

    Ok(Json(json!({
        "status": "ok",
        "summary": output.report.summary(),
        "report": output.report,
        "file_name": ARCHIVE_FILE_NAME,
        "archive": STANDARD.encode(&output.archive),
    }))
    .into_response())
}

fn job_error(e: JobError) -> (StatusCode, Json<Value>) {
    tracing::warn!("Card job rejected: {e}");
    err_json(e.status_code(), &e.to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::server::router::create_router;
    use crate::services::cards::tests::{small_layout, template_png};

    const BOUNDARY: &str = "card-test-boundary";

    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match filename {
                Some(f) => format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\r\n"
                ),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn router() -> axum::Router {
        create_router(SharedState::new(AppConfig::default()))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status() {
        let response = router()
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_default_layout() {
        let response = router()
            .oneshot(
                Request::get("/api/layout/default")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let layout: LayoutConfig =
            serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(layout, LayoutConfig::default());
    }

    #[tokio::test]
    async fn test_preview_without_uploads_is_rejected() {
        let response = router()
            .oneshot(upload("/api/preview", &[("layout", None, b"")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Upload template image and CSV file to continue.");
    }

    #[tokio::test]
    async fn test_invalid_layout_json_is_rejected() {
        let template = template_png();
        let response = router()
            .oneshot(upload(
                "/api/generate",
                &[
                    ("template", Some("t.png"), &template),
                    ("csv", Some("d.csv"), b"ID,Text,URL\n1,a,https://x\n"),
                    ("layout", None, b"{not json"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_returns_png_with_card_id() {
        let template = template_png();
        let layout = serde_json::to_vec(&small_layout()).unwrap();
        let response = router()
            .oneshot(upload(
                "/api/preview?mode=first",
                &[
                    ("template", Some("t.png"), &template),
                    ("csv", Some("d.csv"), b"ID,Text,URL\n001,Room A,https://x/1\n"),
                    ("layout", None, &layout),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(response.headers()[CARD_ID_HEADER], "001");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (200, 300));
    }

    #[tokio::test]
    async fn test_generate_reports_failures_and_returns_archive() {
        let template = template_png();
        let layout = serde_json::to_vec(&small_layout()).unwrap();
        let response = router()
            .oneshot(upload(
                "/api/generate",
                &[
                    ("template", Some("t.png"), &template),
                    (
                        "csv",
                        Some("d.csv"),
                        b"ID,Text,URL\n001,Room A,https://x/1\n002,,\n",
                    ),
                    ("layout", None, &layout),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["file_name"], ARCHIVE_FILE_NAME);
        assert_eq!(body["report"]["succeeded"], 1);
        assert_eq!(body["report"]["failed"], 1);
        assert_eq!(body["summary"][0], "Generated 1 of 2 cards");

        let archive = STANDARD.decode(body["archive"].as_str().unwrap()).unwrap();
        assert!(archive.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_generate_zip_download() {
        let template = template_png();
        let layout = serde_json::to_vec(&small_layout()).unwrap();
        let response = router()
            .oneshot(upload(
                "/api/generate?format=zip",
                &[
                    ("template", Some("t.png"), &template),
                    (
                        "csv",
                        Some("d.csv"),
                        b"ID,Text,URL\n001,Room A,https://x/1\n002,,\n",
                    ),
                    ("layout", None, &layout),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"qr_cards.zip\""
        );
        assert_eq!(headers[SUCCEEDED_HEADER], "1");
        assert_eq!(headers[FAILED_HEADER], "1");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
