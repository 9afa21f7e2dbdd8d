//! Evaluation run
//!
//! Loads both label files, pairs them up and prints the selected report.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{EvalConfig, ReportMode};
use crate::evaluation::{aggregate, resolve_pairs, ConfusionAccumulator};
use crate::labels::LabelStore;
use crate::report;

/// Score `predictions` against `targets` and write the report to `out`
pub fn run<W: Write>(predictions: &Path, targets: &Path, config: &EvalConfig, out: &mut W) -> Result<()> {
    config.validate()?;
    let alphabet = config.alphabet();
    let long_word_min_len = config.metrics.long_word_min_len;

    let predicted = LabelStore::load(predictions, &alphabet)
        .with_context(|| format!("Failed to load predictions from {:?}", predictions))?;
    let expected = LabelStore::load(targets, &alphabet)
        .with_context(|| format!("Failed to load targets from {:?}", targets))?;

    if expected.is_empty() {
        warn!("No usable target labels in {:?}; all metrics will be zero", targets);
    }

    let pairs = resolve_pairs(&predicted, &expected).context("Failed to match predictions to targets")?;

    info!(
        "Scoring {} samples in {:?} mode (long words: >= {} chars)",
        pairs.len(),
        config.report.mode,
        long_word_min_len
    );

    match config.report.mode {
        ReportMode::General => {
            let table = aggregate(&pairs, &alphabet, long_word_min_len)?;
            report::write_metrics(out, &table)?;
        }
        ReportMode::Full => {
            let mut confusion = ConfusionAccumulator::new(&alphabet, long_word_min_len);
            for pair in &pairs {
                confusion.add(pair);
            }

            info!("{} of {} samples mispredicted", confusion.mistakes().len(), confusion.pairs());
            for mistake in confusion.mistakes() {
                debug!("  {}: {:?} -> {:?}", mistake.identifier, mistake.predicted, mistake.target);
            }
            if confusion.unmapped() > 0 {
                warn!(
                    "{} edit operations involved characters outside the alphabet and were not tallied",
                    confusion.unmapped()
                );
            }

            report::write_confusion(out, &confusion)?;
        }
    }

    out.flush()?;
    Ok(())
}
