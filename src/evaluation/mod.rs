//! Evaluation Layer
//!
//! Pairs predictions with ground truth and scores them. Two scorers are
//! available:
//! - Metric aggregation (accuracy, normalized edit distances)
//! - Character confusion matrices

pub mod confusion;
pub mod metrics;

pub use confusion::{ConfusionAccumulator, ConfusionMatrix, Mistake};
pub use metrics::{aggregate, BucketTotals, Metric, MetricAggregator, MetricKind, MetricTable};

use std::borrow::Cow;
use tracing::info;

use crate::error::EvalError;
use crate::labels::{Alphabet, LabelStore};

/// How letter case is treated when comparing a prediction to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonCase {
    /// Case preserved ("LC + UC")
    CaseSensitive,
    /// Both strings lowercased ("MC")
    CaseFolded,
}

impl ComparisonCase {
    /// Label used in report names
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonCase::CaseSensitive => "LC + UC",
            ComparisonCase::CaseFolded => "MC",
        }
    }

    /// Cases to score for an alphabet, in report order.
    ///
    /// A lowercase-only alphabet has no case-sensitive comparison.
    pub fn applicable(alphabet: &Alphabet) -> Vec<ComparisonCase> {
        if alphabet.is_case_sensitive() {
            vec![ComparisonCase::CaseSensitive, ComparisonCase::CaseFolded]
        } else {
            vec![ComparisonCase::CaseFolded]
        }
    }

    /// Adjust a string for comparison under this case
    pub fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            ComparisonCase::CaseSensitive => Cow::Borrowed(text),
            ComparisonCase::CaseFolded => Cow::Owned(text.to_lowercase()),
        }
    }
}

/// Length-based partition of the sample set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthStratum {
    All,
    Long,
    Short,
}

impl LengthStratum {
    /// All strata in report order
    pub const ALL: [LengthStratum; 3] = [LengthStratum::All, LengthStratum::Long, LengthStratum::Short];

    pub fn name(&self) -> &'static str {
        match self {
            LengthStratum::All => "all words",
            LengthStratum::Long => "long words",
            LengthStratum::Short => "short words",
        }
    }

    /// Long or short, by target length against the threshold
    pub fn classify(target_len: usize, long_word_min_len: usize) -> LengthStratum {
        if target_len >= long_word_min_len {
            LengthStratum::Long
        } else {
            LengthStratum::Short
        }
    }
}

/// Report name for a case and stratum, e.g. "MC, long words"
pub fn bucket_name(case: ComparisonCase, stratum: LengthStratum) -> String {
    format!("{}, {}", case.name(), stratum.name())
}

/// A prediction matched to its ground truth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub identifier: String,
    pub predicted: String,
    pub target: String,
}

impl SamplePair {
    pub fn new(identifier: impl Into<String>, predicted: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            predicted: predicted.into(),
            target: target.into(),
        }
    }

    /// Target length in characters
    pub fn target_len(&self) -> usize {
        self.target.chars().count()
    }
}

/// Match every target sample with its prediction.
///
/// Predictions without a target are ignored; a target without a
/// prediction aborts the run.
pub fn resolve_pairs(predictions: &LabelStore, targets: &LabelStore) -> Result<Vec<SamplePair>, EvalError> {
    let pairs = targets
        .iter()
        .map(|(identifier, target)| {
            let predicted = predictions
                .get(identifier)
                .ok_or_else(|| EvalError::MissingPrediction {
                    identifier: identifier.to_string(),
                })?;
            Ok(SamplePair::new(identifier, predicted, target))
        })
        .collect::<Result<Vec<_>, EvalError>>()?;

    info!(
        "Resolved {} sample pairs ({} predictions unused)",
        pairs.len(),
        predictions.len().saturating_sub(pairs.len())
    );
    Ok(pairs)
}
