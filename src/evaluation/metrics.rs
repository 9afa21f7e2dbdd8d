//! Stratified accuracy and normalized edit distance

use std::collections::HashMap;

use super::{bucket_name, ComparisonCase, LengthStratum, SamplePair};
use crate::alignment::distance;
use crate::error::EvalError;
use crate::labels::Alphabet;

/// Kind of a reported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Fraction of exactly matching words
    Accuracy,
    /// Mean of per-word `distance / target length`
    NormalizedEditDistance1,
    /// Total distance over total target characters
    NormalizedEditDistance2,
}

impl MetricKind {
    /// All kinds in report order
    pub const ALL: [MetricKind; 3] = [
        MetricKind::Accuracy,
        MetricKind::NormalizedEditDistance1,
        MetricKind::NormalizedEditDistance2,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Accuracy => "Accuracy",
            MetricKind::NormalizedEditDistance1 => "Normalized edit distance 1",
            MetricKind::NormalizedEditDistance2 => "Normalized edit distance 2",
        }
    }
}

/// A single metric value for one case and stratum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub kind: MetricKind,
    pub case: ComparisonCase,
    pub stratum: LengthStratum,
    pub value: f64,
}

impl Metric {
    /// Display name, e.g. "Accuracy (MC, long words)"
    pub fn name(&self) -> String {
        format!("{} ({})", self.kind.label(), bucket_name(self.case, self.stratum))
    }
}

/// Metrics in report order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    metrics: Vec<Metric>,
}

impl MetricTable {
    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    pub fn get(&self, kind: MetricKind, case: ComparisonCase, stratum: LengthStratum) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.kind == kind && m.case == case && m.stratum == stratum)
            .map(|m| m.value)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Running sums for one case and stratum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketTotals {
    /// Exactly matching words
    pub correct: usize,
    /// Sum of edit distances
    pub edit_distance: usize,
    /// Sum of per-word `distance / target length`
    pub normalized_edit_distance: f64,
}

/// Word and character counts of one stratum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StratumCounts {
    pub words: usize,
    pub chars: usize,
}

/// Accumulates per-pair correctness and distance into stratified metrics
#[derive(Debug, Clone)]
pub struct MetricAggregator {
    cases: Vec<ComparisonCase>,
    long_word_min_len: usize,
    totals: HashMap<(ComparisonCase, LengthStratum), BucketTotals>,
    counts: HashMap<LengthStratum, StratumCounts>,
}

impl MetricAggregator {
    pub fn new(alphabet: &Alphabet, long_word_min_len: usize) -> Self {
        Self {
            cases: ComparisonCase::applicable(alphabet),
            long_word_min_len,
            totals: HashMap::new(),
            counts: HashMap::new(),
        }
    }

    /// Score one pair under every applicable case
    pub fn add(&mut self, pair: &SamplePair) -> Result<(), EvalError> {
        let target_len = pair.target_len();
        if target_len == 0 {
            return Err(EvalError::EmptyTargetLabel {
                identifier: pair.identifier.clone(),
            });
        }
        let stratum = LengthStratum::classify(target_len, self.long_word_min_len);

        for &case in &self.cases {
            let predicted = case.prepare(&pair.predicted);
            let target = case.prepare(&pair.target);
            let is_correct = predicted == target;
            let edit_distance = distance(&predicted, &target);
            let normalized = edit_distance as f64 / target.chars().count() as f64;

            for bucket in [LengthStratum::All, stratum] {
                let totals = self.totals.entry((case, bucket)).or_default();
                totals.correct += usize::from(is_correct);
                totals.edit_distance += edit_distance;
                totals.normalized_edit_distance += normalized;
            }
        }

        for bucket in [LengthStratum::All, stratum] {
            let counts = self.counts.entry(bucket).or_default();
            counts.words += 1;
            counts.chars += target_len;
        }

        Ok(())
    }

    /// Running sums for a case and stratum (zero if nothing was added)
    pub fn totals(&self, case: ComparisonCase, stratum: LengthStratum) -> BucketTotals {
        self.totals.get(&(case, stratum)).copied().unwrap_or_default()
    }

    /// Word and character counts for a stratum
    pub fn counts(&self, stratum: LengthStratum) -> StratumCounts {
        self.counts.get(&stratum).copied().unwrap_or_default()
    }

    /// Compute the final metric table.
    ///
    /// Empty strata divide by one and report zero.
    pub fn finish(&self) -> MetricTable {
        let mut metrics = Vec::with_capacity(MetricKind::ALL.len() * self.cases.len() * LengthStratum::ALL.len());

        for kind in MetricKind::ALL {
            for &case in &self.cases {
                for stratum in LengthStratum::ALL {
                    let totals = self.totals(case, stratum);
                    let counts = self.counts(stratum);
                    let words = counts.words.max(1) as f64;
                    let chars = counts.chars.max(1) as f64;

                    let value = match kind {
                        MetricKind::Accuracy => totals.correct as f64 / words,
                        MetricKind::NormalizedEditDistance1 => totals.normalized_edit_distance / words,
                        MetricKind::NormalizedEditDistance2 => totals.edit_distance as f64 / chars,
                    };
                    metrics.push(Metric { kind, case, stratum, value });
                }
            }
        }

        MetricTable { metrics }
    }
}

/// Score a whole sample set in one call
pub fn aggregate(pairs: &[SamplePair], alphabet: &Alphabet, long_word_min_len: usize) -> Result<MetricTable, EvalError> {
    let mut aggregator = MetricAggregator::new(alphabet, long_word_min_len);
    for pair in pairs {
        aggregator.add(pair)?;
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::resolve_pairs;
    use crate::labels::LabelStore;
    use std::path::Path;

    const ALL: LengthStratum = LengthStratum::All;
    const LONG: LengthStratum = LengthStratum::Long;
    const SHORT: LengthStratum = LengthStratum::Short;
    const LCUC: ComparisonCase = ComparisonCase::CaseSensitive;
    const MC: ComparisonCase = ComparisonCase::CaseFolded;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn corpus() -> Vec<SamplePair> {
        vec![
            SamplePair::new("1.png", "hello", "Hello"),
            SamplePair::new("2.png", "world", "world"),
            SamplePair::new("3.png", "intemationalization", "internationalization"),
            SamplePair::new("4.png", "Recognition", "recognition"),
            SamplePair::new("5.png", "c4t", "cat"),
        ]
    }

    #[test]
    fn test_case_only_error() {
        let pairs = vec![SamplePair::new("1.png", "hello", "Hello")];
        let table = aggregate(&pairs, &Alphabet::default(), 10).unwrap();

        assert!(approx(table.get(MetricKind::Accuracy, MC, ALL).unwrap(), 1.0));
        assert!(approx(table.get(MetricKind::Accuracy, LCUC, ALL).unwrap(), 0.0));
        assert!(approx(table.get(MetricKind::NormalizedEditDistance2, LCUC, ALL).unwrap(), 0.2));

        let mut aggregator = MetricAggregator::new(&Alphabet::default(), 10);
        aggregator.add(&pairs[0]).unwrap();
        assert_eq!(aggregator.totals(LCUC, ALL).edit_distance, 1);
        assert_eq!(aggregator.totals(MC, ALL).edit_distance, 0);
    }

    #[test]
    fn test_long_word_only_in_long_stratum() {
        let mut aggregator = MetricAggregator::new(&Alphabet::default(), 10);
        aggregator
            .add(&SamplePair::new("1.png", "internationalization", "internationalization"))
            .unwrap();

        assert_eq!(aggregator.counts(ALL), StratumCounts { words: 1, chars: 20 });
        assert_eq!(aggregator.counts(LONG), StratumCounts { words: 1, chars: 20 });
        assert_eq!(aggregator.counts(SHORT), StratumCounts::default());
        assert_eq!(aggregator.totals(MC, LONG).correct, 1);
        assert_eq!(aggregator.totals(MC, SHORT).correct, 0);

        let table = aggregator.finish();
        assert!(approx(table.get(MetricKind::Accuracy, MC, LONG).unwrap(), 1.0));
        assert!(approx(table.get(MetricKind::Accuracy, MC, SHORT).unwrap(), 0.0));
    }

    #[test]
    fn test_strata_partition() {
        let mut aggregator = MetricAggregator::new(&Alphabet::default(), 10);
        for pair in corpus() {
            aggregator.add(&pair).unwrap();
        }

        for case in [LCUC, MC] {
            let all = aggregator.totals(case, ALL);
            let long = aggregator.totals(case, LONG);
            let short = aggregator.totals(case, SHORT);
            assert_eq!(all.correct, long.correct + short.correct);
            assert_eq!(all.edit_distance, long.edit_distance + short.edit_distance);
            assert!(approx(
                all.normalized_edit_distance,
                long.normalized_edit_distance + short.normalized_edit_distance
            ));
        }

        let all = aggregator.counts(ALL);
        assert_eq!(all.words, aggregator.counts(LONG).words + aggregator.counts(SHORT).words);
        assert_eq!(all.chars, aggregator.counts(LONG).chars + aggregator.counts(SHORT).chars);
    }

    #[test]
    fn test_case_folding_never_lowers_accuracy() {
        let table = aggregate(&corpus(), &Alphabet::default(), 10).unwrap();
        for stratum in LengthStratum::ALL {
            let folded = table.get(MetricKind::Accuracy, MC, stratum).unwrap();
            let strict = table.get(MetricKind::Accuracy, LCUC, stratum).unwrap();
            assert!(folded >= strict, "{stratum:?}: {folded} < {strict}");
        }
    }

    #[test]
    fn test_macro_and_micro_normalization_differ() {
        let pairs = vec![
            SamplePair::new("1.png", "b", "a"),
            SamplePair::new("2.png", "abcdefghi", "abcdefghi"),
        ];
        let table = aggregate(&pairs, &Alphabet::default(), 10).unwrap();

        // (1/1 + 0/9) / 2 words
        assert!(approx(table.get(MetricKind::NormalizedEditDistance1, MC, ALL).unwrap(), 0.5));
        // 1 edit / 10 chars
        assert!(approx(table.get(MetricKind::NormalizedEditDistance2, MC, ALL).unwrap(), 0.1));
    }

    #[test]
    fn test_empty_strata_report_zero() {
        let table = aggregate(&[], &Alphabet::default(), 10).unwrap();
        assert_eq!(table.len(), 18);
        assert!(table.iter().all(|m| m.value == 0.0));
    }

    #[test]
    fn test_empty_target_rejected() {
        let mut aggregator = MetricAggregator::new(&Alphabet::default(), 10);
        let result = aggregator.add(&SamplePair::new("1.png", "abc", ""));
        assert!(matches!(result, Err(EvalError::EmptyTargetLabel { .. })));
    }

    #[test]
    fn test_report_order() {
        let table = aggregate(&corpus(), &Alphabet::default(), 10).unwrap();
        let names: Vec<String> = table.iter().map(Metric::name).collect();
        assert_eq!(names[0], "Accuracy (LC + UC, all words)");
        assert_eq!(names[2], "Accuracy (LC + UC, short words)");
        assert_eq!(names[3], "Accuracy (MC, all words)");
        assert_eq!(names[6], "Normalized edit distance 1 (LC + UC, all words)");
        assert_eq!(names[17], "Normalized edit distance 2 (MC, short words)");
    }

    #[test]
    fn test_lowercase_alphabet_omits_case_sensitive_metrics() {
        let table = aggregate(&corpus(), &Alphabet::new(DEFAULT_LOWER), 10).unwrap();
        assert_eq!(table.len(), 9);
        assert!(table.iter().all(|m| m.case == MC));
    }

    const DEFAULT_LOWER: &str = "'-.0123456789abcdefghijklmnopqrstuvwxyz";

    #[test]
    fn test_out_of_alphabet_target_not_counted() {
        let alphabet = Alphabet::default();
        let predictions = LabelStore::parse(
            "1.png\thello\n2.png\thello\n".as_bytes(),
            Path::new("pred.txt"),
            &alphabet,
        )
        .unwrap();
        let targets = LabelStore::parse(
            "1.png\théllo\n2.png\thello\n".as_bytes(),
            Path::new("gt.txt"),
            &alphabet,
        )
        .unwrap();

        let pairs = resolve_pairs(&predictions, &targets).unwrap();
        let mut aggregator = MetricAggregator::new(&alphabet, 10);
        for pair in &pairs {
            aggregator.add(pair).unwrap();
        }

        assert_eq!(aggregator.counts(ALL).words, 1);
        let table = aggregator.finish();
        assert!(approx(table.get(MetricKind::Accuracy, LCUC, ALL).unwrap(), 1.0));
    }
}
