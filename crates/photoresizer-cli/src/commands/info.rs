use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use photoresizer_core::io::probe::probe_image;
use photoresizer_core::units::format_file_size;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    if !args.file.exists() {
        bail!("{} does not exist", args.file.display());
    }
    let info = probe_image(&args.file);

    println!("File:        {}", args.file.display());
    match (info.known_width(), info.known_height()) {
        (Some(w), Some(h)) => println!("Dimensions:  {w}x{h}"),
        _ => println!("Dimensions:  unknown"),
    }
    println!(
        "Size:        {} ({} bytes)",
        format_file_size(info.byte_size as i64),
        info.byte_size
    );

    Ok(())
}
