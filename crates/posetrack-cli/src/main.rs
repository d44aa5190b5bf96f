mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "posetrack", about = "Color-marker calibration tool for pose-tracking rigs")]
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
    /// Extract equidistant captures from a video
    Sample(commands::sample::SampleArgs),
    /// Detect markers in a single image
    Detect(commands::detect::DetectArgs),
    /// Resolve the tracked marker's physical position for every image in a manifest
    Batch(commands::batch::BatchArgs),
    /// Show video source metadata
    Info(commands::info::InfoArgs),
    /// Print the default calibration config
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
        Commands::Sample(args) => commands::sample::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
