//! huffpack command line driver
//!
//! ## Usage
//!
//! ```bash
//! # Compress next to the input (notes.txt -> notes.txt.huff)
//! huffpack compress notes.txt
//!
//! # Decompress to an explicit path
//! huffpack decompress notes.txt.huff -o notes.restored.txt
//!
//! # Compress then decompress to derived paths
//! huffpack roundtrip WarAndPeace.txt --log-level debug
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use huffpack::{compress_file, decompress_file, CodecConfig};

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Huffman compression for files", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a .huff artifact
    Compress {
        input: PathBuf,
        /// Artifact path (defaults to <input>.huff)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reconstruct the original file from an artifact
    Decompress {
        input: PathBuf,
        /// Output path (defaults to decompressed<name>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compress then decompress, writing both files next to the input
    Roundtrip { input: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CodecConfig::from_file(path)?,
        None => CodecConfig::default(),
    };

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Compress { input, output } => {
            let output = output.unwrap_or_else(|| config.output_paths(&input).compressed);
            compress(&input, &output, &config)?;
        }
        Command::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| config.decompressed_path_for(&input));
            decompress_file(&input, &output, &config)?;
        }
        Command::Roundtrip { input } => {
            let paths = config.output_paths(&input);
            compress(&input, &paths.compressed, &config)?;
            decompress_file(&paths.compressed, &paths.decompressed, &config)?;
            info!("Round trip written to {}", paths.decompressed.display());
        }
    }

    Ok(())
}

fn compress(input: &Path, output: &Path, config: &CodecConfig) -> huffpack::Result<()> {
    let stats = compress_file(input, output, config)?;
    info!(
        "{} -> {}: {} bytes -> {} bytes, {} symbols, {:.2} bits/symbol",
        input.display(),
        output.display(),
        stats.original_bytes,
        stats.compressed_bytes,
        stats.distinct_symbols,
        stats.bits_per_symbol()
    );
    Ok(())
}
