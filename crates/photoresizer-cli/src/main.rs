mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photoresizer", about = "Resize and recompress photos")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions and file size
    Info(commands::info::InfoArgs),
    /// Predict the output size for given settings
    Estimate(commands::estimate::EstimateArgs),
    /// Render a preview and save the resized copy to the gallery
    Resize(commands::resize::ResizeArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Estimate(args) => commands::estimate::run(args),
        Commands::Resize(args) => commands::resize::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
