use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use photoresizer_core::intent::Intent;
use photoresizer_core::session::{DispatchOutcome, Services, Session};
use photoresizer_core::state::ImageSource;
use tracing::info;

use super::FormatArg;
use crate::summary;

#[derive(Args)]
pub struct ResizeArgs {
    /// Input image
    pub file: PathBuf,

    /// Target width in pixels (defaults to the original width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels (defaults to the original height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Output quality (1-100, ignored for PNG)
    #[arg(short, long, default_value = "80")]
    pub quality: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "jpeg")]
    pub format: FormatArg,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the resized copy is saved into
    #[arg(long)]
    pub gallery_dir: Option<PathBuf>,

    /// Transcoder executable
    #[arg(long)]
    pub tool: Option<PathBuf>,

    /// Stop after rendering the preview
    #[arg(long)]
    pub preview_only: bool,
}

pub fn run(args: &ResizeArgs) -> Result<()> {
    if !args.file.exists() {
        bail!("{} does not exist", args.file.display());
    }

    let mut config = super::config::load(args.config.as_deref())?;
    if let Some(ref dir) = args.gallery_dir {
        config.gallery_dir = dir.clone();
    }
    if let Some(ref tool) = args.tool {
        config.tool = tool.clone();
    }

    let mut session = Session::new(Services::from_config(config));
    let source = ImageSource::new(&args.file);

    session.dispatch(Intent::PickImage(source.clone()));
    wait(&mut session, "Reading image")?;

    session.dispatch(Intent::SetQuality(args.quality));
    session.dispatch(Intent::SetFormat(args.format.into()));
    if let Some(w) = args.width {
        session.dispatch(Intent::SetWidth(w));
    }
    if let Some(h) = args.height {
        session.dispatch(Intent::SetHeight(h));
    }
    summary::print_settings(session.state(), session.config());

    run_step(&mut session, Intent::Compress(source), "Rendering preview")?;
    summary::print_result("Preview", session.state());

    if args.preview_only {
        return Ok(());
    }

    run_step(&mut session, Intent::SaveToPhoto, "Saving to gallery")?;
    summary::print_result("Saved", session.state());
    if let Some(ref saved) = session.state().compressed_source {
        info!(path = %saved, "Resized copy saved");
    }

    Ok(())
}

/// Dispatch one background intent and wait for it, failing on any error
/// the session reports.
fn run_step(session: &mut Session, intent: Intent, label: &str) -> Result<()> {
    let outcome = session.dispatch(intent);
    if outcome == DispatchOutcome::Rejected {
        let message = session
            .state()
            .error_message
            .clone()
            .unwrap_or_else(|| format!("{label} was rejected"));
        bail!(message);
    }
    wait(session, label)?;
    if let Some(ref message) = session.state().error_message {
        bail!("{label} failed: {message}");
    }
    Ok(())
}

fn wait(session: &mut Session, label: &str) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    while !session.wait_idle(Duration::from_millis(100)) {}

    pb.finish_and_clear();
    Ok(())
}
