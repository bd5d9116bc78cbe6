//! Card job service: turns uploaded files and a layout into previews and archives.

use card_batch::{
    BatchError, BatchOutput, PreviewMode, PreviewOutput, RecordColumns, read_records,
    render_preview, run_batch,
};
use card_engine::{CardError, Composer, LayoutConfig, Record};
use image::DynamicImage;
use tracing::info;

use crate::config::{AppConfig, validate_layout};
use crate::services::font::{FontError, FontUpload, resolve_font};

/// Everything a job needs, as raw uploaded bytes.
#[derive(Debug, Clone, Default)]
pub struct JobInputs {
    pub template: Option<Vec<u8>>,
    pub csv: Option<Vec<u8>>,
    pub font: Option<FontUpload>,
    pub logo: Option<Vec<u8>>,
    pub layout: LayoutConfig,
    pub columns: RecordColumns,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Upload template image and CSV file to continue.")]
    MissingUpload,
    #[error("invalid layout: {}", .0.join("; "))]
    InvalidLayout(Vec<String>),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl JobError {
    /// HTTP status code for API responses.
    pub fn status_code(&self) -> u16 {
        match self {
            JobError::MissingUpload => 400,
            JobError::InvalidLayout(_) => 422,
            JobError::Font(_) => 400,
            JobError::Card(e) if e.is_per_record() => 422,
            JobError::Card(_) => 400,
            JobError::Batch(BatchError::Card(e)) if e.is_per_record() => 422,
            JobError::Batch(BatchError::Archive(_)) => 500,
            JobError::Batch(_) => 400,
        }
    }
}

/// A loaded job: a prepared composer plus the records to render.
pub struct CardJob {
    composer: Composer,
    records: Vec<Record>,
}

impl CardJob {
    /// Validate and load all inputs. Every structural error surfaces here,
    /// before any card is rendered.
    pub fn load(inputs: JobInputs, config: &AppConfig) -> Result<Self, JobError> {
        let (Some(template), Some(csv)) = (inputs.template, inputs.csv) else {
            return Err(JobError::MissingUpload);
        };

        validate_layout(&inputs.layout).map_err(JobError::InvalidLayout)?;

        let records = read_records(csv.as_slice(), &inputs.columns)?;
        let template = decode_image(&template, "template")?;
        let font = resolve_font(inputs.font, config.default_font_path.as_deref())?;
        let logo = inputs
            .logo
            .as_deref()
            .map(|bytes| decode_image(bytes, "logo"))
            .transpose()?;

        info!(
            records = records.len(),
            width = template.width(),
            height = template.height(),
            has_logo = logo.is_some(),
            "Card job loaded"
        );

        let composer = Composer::new(&template, font, logo.as_ref(), inputs.layout);
        Ok(Self { composer, records })
    }

    /// Render a single preview card.
    pub fn preview(&self, mode: PreviewMode) -> Result<PreviewOutput, JobError> {
        let mut rng = rand::thread_rng();
        Ok(render_preview(&self.composer, &self.records, mode, &mut rng)?)
    }

    /// Render every record into an archive, logging progress per record.
    pub fn generate(&self) -> Result<BatchOutput, JobError> {
        let output = run_batch(&self.composer, &self.records, |p| {
            info!(done = p.done, total = p.total, id = %p.id, ok = p.ok, "Card processed");
        })?;
        Ok(output)
    }
}

fn decode_image(bytes: &[u8], what: &'static str) -> Result<DynamicImage, CardError> {
    image::load_from_memory(bytes).map_err(|source| CardError::Image { what, source })
}
