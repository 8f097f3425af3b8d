//! Folder Normalization Example
//!
//! This example runs the full normalization pipeline over every supported
//! image in a directory: coarse and fine rotation, content-edge cropping,
//! and photometric correction. Results are written to the output directory
//! under the input file names.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example normalize_folder -- [OPTIONS] <INPUT_DIR> <OUTPUT_DIR>
//! ```
//!
//! # Arguments
//!
//! * `<INPUT_DIR>` - Directory containing the images to normalize
//! * `<OUTPUT_DIR>` - Directory to write normalized images to
//! * `-c, --config` - Optional pipeline configuration file (TOML or JSON)
//!
//! # Example
//!
//! ```bash
//! cargo run --example normalize_folder -- \
//!     -c normalize.toml \
//!     scans/ normalized/
//! ```

use clap::Parser;
use docnorm::core::config::ConfigLoader;
use docnorm::pipeline::NormalizePipeline;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Command-line arguments for the folder normalization example
#[derive(Parser)]
#[command(name = "normalize_folder")]
#[command(about = "Folder Normalization Example - deskews, crops and corrects scanned documents")]
struct Args {
    /// Directory containing the images to normalize
    input_dir: PathBuf,

    /// Directory to write normalized images to
    output_dir: PathBuf,

    /// Pipeline configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    docnorm::utils::init_tracing();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Folder Normalization Example");

    if !args.input_dir.is_dir() {
        error!("Input directory not found: {}", args.input_dir.display());
        return Err("Input directory not found".into());
    }

    // Load the pipeline configuration, or fall back to defaults
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ConfigLoader::load_from_file(path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            Default::default()
        }
    };

    let pipeline = NormalizePipeline::new(config)?;

    info!(
        "Normalizing {} -> {}",
        args.input_dir.display(),
        args.output_dir.display()
    );
    let outcome = pipeline.process_directory(&args.input_dir, &args.output_dir)?;

    info!("\n=== Normalization Results ===");
    info!("Succeeded: {}", outcome.succeeded.len());
    info!("Failed:    {}", outcome.failed.len());
    for (path, error) in &outcome.failed {
        warn!("  {}: {}", path.display(), error);
    }

    if outcome.succeeded.is_empty() && !outcome.failed.is_empty() {
        return Err("All files failed to normalize".into());
    }

    Ok(())
}
