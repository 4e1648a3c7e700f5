use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use photoresizer_core::estimate::resolution_ratio;
use photoresizer_core::intent::Intent;
use photoresizer_core::io::probe::probe_image;
use photoresizer_core::reducer::{complete, reduce, Outcome};
use photoresizer_core::state::{EditState, ImageSource};
use photoresizer_core::units::format_file_size;

use super::FormatArg;

#[derive(Args)]
pub struct EstimateArgs {
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
}

pub fn run(args: &EstimateArgs) -> Result<()> {
    let source = ImageSource::new(&args.file);
    let info = probe_image(&args.file);

    // Same transitions the session applies, minus the background probe.
    let mut state = reduce(&EditState::default(), Intent::PickImage(source.clone())).state;
    state = complete(&state, Outcome::Probed { source, info });
    let mut intents = vec![
        Intent::SetQuality(args.quality),
        Intent::SetFormat(args.format.into()),
    ];
    if let Some(w) = args.width {
        intents.push(Intent::SetWidth(w));
    }
    if let Some(h) = args.height {
        intents.push(Intent::SetHeight(h));
    }
    for intent in intents {
        state = reduce(&state, intent).state;
    }

    let (Some(ow), Some(oh)) = (state.original_width, state.original_height) else {
        println!("Could not read dimensions of {}", args.file.display());
        return Ok(());
    };
    let ratio = resolution_ratio(ow, oh, state.target_width, state.target_height).unwrap_or(0.0);
    let estimated = state.estimated_size.unwrap_or(0);

    println!("Original:    {ow}x{oh}, {}", format_file_size(info.byte_size as i64));
    println!(
        "Target:      {}x{} ({:.1}% of pixels)",
        state.target_width,
        state.target_height,
        ratio * 100.0
    );
    println!("Format:      {} (quality {})", state.format, state.quality);
    println!(
        "Estimate:    ~{} ({} bytes)",
        format_file_size(estimated as i64),
        estimated
    );

    Ok(())
}
