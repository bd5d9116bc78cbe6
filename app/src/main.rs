//! QR card studio: HTTP API and command-line batch generation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use card_batch::{PreviewMode, RecordColumns, archive::encode_png};
use card_engine::LayoutConfig;
use qr_card_studio::app::SharedState;
use qr_card_studio::config::AppConfig;
use qr_card_studio::server;
use qr_card_studio::services::cards::{CardJob, JobInputs};
use qr_card_studio::services::font::FontUpload;

#[derive(Parser)]
#[command(name = "qr-card-studio", version, about = "Batch QR card generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API (default).
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render every CSV record into a ZIP archive.
    Generate {
        #[command(flatten)]
        job: JobArgs,
        #[arg(long, default_value = card_batch::ARCHIVE_FILE_NAME)]
        out: PathBuf,
    },
    /// Render a single preview card.
    Preview {
        #[command(flatten)]
        job: JobArgs,
        #[arg(long, default_value_t = PreviewMode::Auto)]
        mode: PreviewMode,
        #[arg(long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Print the default layout as JSON.
    Layout,
}

#[derive(Args)]
struct JobArgs {
    /// Card background image.
    #[arg(long)]
    template: PathBuf,
    /// CSV table of records.
    #[arg(long)]
    csv: PathBuf,
    /// TTF/OTF font for labels.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Logo image pasted on every card.
    #[arg(long)]
    logo: Option<PathBuf>,
    /// Layout JSON file (see the `layout` subcommand).
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Column names as ID,Text,URL.
    #[arg(long)]
    columns: Option<String>,
}

impl JobArgs {
    fn into_inputs(self) -> Result<JobInputs> {
        let layout = match &self.layout {
            Some(path) => serde_json::from_slice::<LayoutConfig>(&read(path)?)
                .with_context(|| format!("invalid layout JSON in {}", path.display()))?,
            None => LayoutConfig::default(),
        };
        let columns = match &self.columns {
            Some(list) => RecordColumns::from_list(list)
                .with_context(|| format!("invalid columns '{list}' (expected ID,Text,URL)"))?,
            None => RecordColumns::default(),
        };
        let font = match &self.font {
            Some(path) => Some(FontUpload {
                filename: path.file_name().map(|n| n.to_string_lossy().into_owned()),
                data: read(path)?,
            }),
            None => None,
        };

        Ok(JobInputs {
            template: Some(read(&self.template)?),
            csv: Some(read(&self.csv)?),
            font,
            logo: self.logo.as_deref().map(read).transpose()?,
            layout,
            columns,
        })
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    qr_card_studio::init_tracing();
    qr_card_studio::load_dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::load();

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            server::start_server(SharedState::new(config)).await
        }
        Command::Generate { job, out } => {
            let inputs = job.into_inputs()?;
            let output = tokio::task::spawn_blocking(move || {
                CardJob::load(inputs, &config)?.generate()
            })
            .await??;

            std::fs::write(&out, &output.archive)
                .with_context(|| format!("failed to write {}", out.display()))?;
            for line in output.report.summary() {
                println!("{line}");
            }
            tracing::info!(path = %out.display(), "Archive written");

            if output.report.succeeded == 0 {
                bail!("no cards were generated");
            }
            Ok(())
        }
        Command::Preview { job, mode, out } => {
            let inputs = job.into_inputs()?;
            let preview =
                tokio::task::spawn_blocking(move || CardJob::load(inputs, &config)?.preview(mode))
                    .await??;

            let png = encode_png(&preview.image).context("failed to encode preview")?;
            std::fs::write(&out, png)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Preview of card {} written to {}", preview.record_id, out.display());
            Ok(())
        }
        Command::Layout => {
            println!("{}", serde_json::to_string_pretty(&LayoutConfig::default())?);
            Ok(())
        }
    }
}
