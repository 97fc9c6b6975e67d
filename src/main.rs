use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use phasescan::{ImagingService, PipelineContext, Settings, codec};

#[derive(Parser)]
#[command(name = "phasescan")]
#[command(
    about = "Simulated contrast phases and liver-region detection for cross-sectional images"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Optional TOML file overriding the default thresholds
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a simulated contrast phase and write the result as PNG
    Process {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Imaging phase: 'arterial' or 'venous'
        #[arg(long)]
        phase: String,

        /// Where to write the processed PNG
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,
    },
    /// Detect a liver-like region and print the result as JSON
    Analyze {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,

        /// Save intermediate stages to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let settings =
        Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    let service = ImagingService::new(settings);

    match args.command {
        Command::Process {
            image_path,
            phase,
            output,
        } => {
            let bytes = std::fs::read(&image_path)
                .with_context(|| format!("Failed to read {}", image_path.display()))?;
            let png = service.process_image_png(&bytes, &phase)?;
            std::fs::write(&output, png)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote {} phase to {}", phase.trim().to_lowercase(), output.display());
        }
        Command::Analyze {
            image_path,
            pretty,
            debug_out,
        } => {
            let bytes = std::fs::read(&image_path)
                .with_context(|| format!("Failed to read {}", image_path.display()))?;
            codec::check_size(&bytes, &service.settings().upload)?;

            let mut context = PipelineContext::new();
            if let Some(debug_dir) = debug_out {
                context = context.with_debug(debug_dir)?;
            }

            let result = service.analyze_image_with(&bytes, &context)?;
            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}
