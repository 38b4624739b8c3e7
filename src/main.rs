//! CardScan - flashcard draft extraction from study material
//!
//! Command-line front end for the extraction pipeline: imports
//! comma-separated card files and runs strategy selection over recognizer
//! line dumps.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cardscan::config::{load_config, ExtractionConfig};
use cardscan::extract::csv;
use cardscan::imaging::Bitmap;
use cardscan::vision::{self, recognizer, RawObservation};

/// CardScan - extract flashcard drafts from study material
#[derive(Parser, Debug)]
#[command(name = "cardscan")]
#[command(about = "Extracts front/back card drafts from recognized text and delimited files")]
struct Args {
    /// Path to a TOML configuration file (defaults are built in)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import front/back pairs from a comma-separated text file
    Csv {
        /// UTF-8 text file, one "term, description" per line
        file: PathBuf,
    },
    /// Run extraction over a recognizer line dump
    Lines {
        /// JSON array of {"text", "box"} observations
        file: PathBuf,
        /// Photograph the lines were recognized from; enables highlight
        /// detection
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ExtractionConfig::default(),
    };

    match args.command {
        Command::Csv { file } => run_csv(&file),
        Command::Lines { file, image } => run_lines(&file, image.as_deref(), &config),
    }
}

/// Import a comma-separated card file and print the drafts
fn run_csv(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let drafts = csv::parse(&content);
    info!(cards = drafts.len(), "imported card file");

    println!("{}", serde_json::to_string_pretty(&drafts)?);
    Ok(())
}

/// Run strategy selection over a recognizer line dump
fn run_lines(file: &Path, image: Option<&Path>, config: &ExtractionConfig) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let observations: Vec<RawObservation> = serde_json::from_str(&content)
        .context("line dump is not a JSON array of {text, box} entries")?;

    let bitmap = image.map(Bitmap::open).transpose()?;
    let lines = recognizer::into_document_order(observations);
    let outcome = vision::extract_from_lines(lines, bitmap.as_ref(), config);

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
