//! ocr-eval - OCR recognition quality evaluation
//!
//! Compares a file of predicted labels against ground truth and reports
//! accuracy, normalized edit distance, or per-character confusion matrices.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ocr_eval::app;
use ocr_eval::config::{self, EvalConfig, ReportMode};

/// ocr-eval - score OCR predictions against ground truth
#[derive(Parser, Debug)]
#[command(name = "ocr-eval")]
#[command(about = "Accuracy, normalized edit distance and confusion matrices for OCR predictions")]
struct Args {
    /// Predictions file: `<image_path>\t<label>` per line
    predictions_file: Option<PathBuf>,

    /// Ground-truth file in the same format
    target_file: Option<PathBuf>,

    /// Minimum length of a long word
    #[arg(short, long = "long-len")]
    long_len: Option<usize>,

    /// Report to print
    #[arg(short, long, value_enum)]
    mode: Option<ReportMode>,

    /// Admissible label characters
    #[arg(short, long)]
    alphabet: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the report
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = resolve_config(&args)?;

    if let Some(path) = &args.write_config {
        config::save_config(&config, path)
            .with_context(|| format!("Failed to write configuration to {:?}", path))?;
        info!("Wrote configuration to {:?}", path);
        return Ok(());
    }

    let (Some(predictions), Some(targets)) = (&args.predictions_file, &args.target_file) else {
        anyhow::bail!("both PREDICTIONS_FILE and TARGET_FILE are required");
    };

    let stdout = std::io::stdout();
    app::run(predictions, targets, &config, &mut stdout.lock())
}

/// Defaults, then the config file, then command-line flags
fn resolve_config(args: &Args) -> Result<EvalConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => load_or_default_config(),
    };

    if let Some(long_len) = args.long_len {
        config.metrics.long_word_min_len = long_len;
    }
    if let Some(mode) = args.mode {
        config.report.mode = mode;
    }
    if let Some(alphabet) = &args.alphabet {
        config.labels.alphabet = alphabet.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from the default location or fall back to defaults
fn load_or_default_config() -> EvalConfig {
    if let Some(config_path) = config::default_config_path() {
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
            tracing::warn!("Ignoring unreadable configuration at {:?}", config_path);
        }
    }
    EvalConfig::default()
}
