//! Pitchside terminal client.
//!
//! Uploads a match video for analysis (or drives a sample run), renders the
//! staged progress display, and prints the returned analytics.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pitchside_cli::TerminalPresenter;
use pitchside_models::{StageCatalog, UploadFile};
use pitchside_session::{Orchestrator, OrchestratorConfig, SessionOutcome};
use pitchside_transport::{UploadClient, UploadClientConfig};

struct CliArgs {
    video: Option<PathBuf>,
    sample: bool,
    save: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs {
        video: None,
        sample: false,
        save: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => parsed.sample = true,
            "--save" => {
                let path = args.next().context("--save requires a path")?;
                parsed.save = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ if parsed.video.is_none() && !arg.starts_with('-') => {
                parsed.video = Some(PathBuf::from(arg));
            }
            other => bail!("unrecognized argument: {other}"),
        }
    }

    if parsed.sample == parsed.video.is_some() {
        print_usage();
        bail!("pass exactly one of a video file or --sample");
    }
    Ok(parsed)
}

fn print_usage() {
    eprintln!("Usage: pitchside <video-file> [--save <path>]");
    eprintln!("       pitchside --sample");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = parse_args()?;

    let transport_config = UploadClientConfig::from_env();
    let server_url = transport_config.base_url.clone();
    let transport = Arc::new(UploadClient::new(transport_config)?);

    let catalog = StageCatalog::default();
    let presenter = TerminalPresenter::new(catalog.clone(), server_url);
    let mut orchestrator = Orchestrator::new(
        catalog,
        OrchestratorConfig::from_env(),
        transport.clone(),
        presenter,
    );

    if args.sample {
        orchestrator.start_sample()?;
    } else {
        let path = args.video.context("no video file given")?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let file = UploadFile::new(&path, metadata.len());
        eprintln!("{} — {}", file.file_name(), file.summary());
        orchestrator.start_live(file)?;
    }

    match orchestrator.run().await {
        SessionOutcome::Completed(Some(payload)) => {
            if let Some(dest) = args.save {
                let written = transport
                    .download(&payload.processed_video_url, &dest)
                    .await
                    .context("failed to download processed video")?;
                info!(bytes = written, dest = %dest.display(), "Saved processed video");
                eprintln!("Saved processed video to {}", dest.display());
            }
            Ok(())
        }
        SessionOutcome::Completed(None) => Ok(()),
        SessionOutcome::Failed => {
            // The presenter already showed the failure notice.
            std::process::exit(1);
        }
    }
}
