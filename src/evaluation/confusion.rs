//! Character confusion matrices
//!
//! Every edit operation of every aligned pair is tallied per character:
//! insertions, deletions and `source -> destination` substitutions.

use std::collections::HashMap;
use tracing::debug;

use super::{ComparisonCase, LengthStratum, SamplePair};
use crate::alignment::{align_chars, EditKind, EditOp};
use crate::labels::Alphabet;

/// Strata that get a confusion matrix, in report order
pub const MATRIX_STRATA: [LengthStratum; 2] = [LengthStratum::All, LengthStratum::Long];

const INSERT_ROW: usize = 0;
const DELETE_ROW: usize = 1;
const SOURCE_ROWS: usize = 2;

/// Row of a confusion matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixRow {
    /// Inserted characters, by inserted character
    Insert,
    /// Deleted characters, by deleted character
    Delete,
    /// Substitutions from this source character, by destination
    Source(char),
}

impl MatrixRow {
    pub fn label(&self) -> String {
        match self {
            MatrixRow::Insert => "ins".to_string(),
            MatrixRow::Delete => "del".to_string(),
            MatrixRow::Source(c) => c.to_string(),
        }
    }
}

/// Fixed-shape count table over an alphabet
///
/// Layout is row-major: `ins`, `del`, then one row per symbol; one column
/// per symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    symbols: Vec<char>,
    columns: HashMap<char, usize>,
    counts: Vec<u64>,
    /// Operations touching a character outside `symbols`
    unmapped: u64,
}

impl ConfusionMatrix {
    /// Zeroed matrix over `symbols`
    pub fn new(symbols: &[char]) -> Self {
        let columns = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            symbols: symbols.to_vec(),
            columns,
            counts: vec![0; (symbols.len() + SOURCE_ROWS) * symbols.len()],
            unmapped: 0,
        }
    }

    /// Column characters in order
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Rows in report order
    pub fn rows(&self) -> impl Iterator<Item = (MatrixRow, &[u64])> + '_ {
        let width = self.symbols.len();
        [MatrixRow::Insert, MatrixRow::Delete]
            .into_iter()
            .chain(self.symbols.iter().map(|&c| MatrixRow::Source(c)))
            .enumerate()
            .map(move |(row, key)| (key, &self.counts[row * width..(row + 1) * width]))
    }

    pub fn insertions(&self, c: char) -> u64 {
        self.cell(INSERT_ROW, c)
    }

    pub fn deletions(&self, c: char) -> u64 {
        self.cell(DELETE_ROW, c)
    }

    pub fn substitutions(&self, from: char, to: char) -> u64 {
        match self.columns.get(&from) {
            Some(&row) => self.cell(row + SOURCE_ROWS, to),
            None => 0,
        }
    }

    /// Sum of all counted operations
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn unmapped(&self) -> u64 {
        self.unmapped
    }

    /// Tally the operations of one alignment of `pred` onto `target`
    pub fn record(&mut self, pred: &[char], target: &[char], ops: &[EditOp]) {
        for op in ops {
            let cell = match op.kind {
                EditKind::Insert => self.index(INSERT_ROW, target[op.target]),
                EditKind::Delete => self.index(DELETE_ROW, pred[op.pred]),
                EditKind::Substitute => self
                    .columns
                    .get(&pred[op.pred])
                    .and_then(|&row| self.index(row + SOURCE_ROWS, target[op.target])),
            };

            match cell {
                Some(cell) => self.counts[cell] += 1,
                None => self.unmapped += 1,
            }
        }
    }

    fn index(&self, row: usize, column: char) -> Option<usize> {
        self.columns
            .get(&column)
            .map(|&col| row * self.symbols.len() + col)
    }

    fn cell(&self, row: usize, column: char) -> u64 {
        self.index(row, column).map_or(0, |i| self.counts[i])
    }
}

/// A sample whose prediction differs from its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mistake {
    pub identifier: String,
    pub predicted: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CaseMatrix {
    case: ComparisonCase,
    stratum: LengthStratum,
    matrix: ConfusionMatrix,
}

/// Confusion matrices for every comparison case and stratum
#[derive(Debug, Clone)]
pub struct ConfusionAccumulator {
    cases: Vec<ComparisonCase>,
    long_word_min_len: usize,
    matrices: Vec<CaseMatrix>,
    mistakes: Vec<Mistake>,
    pairs: usize,
}

impl ConfusionAccumulator {
    /// Pre-allocate zeroed matrices for every applicable case
    pub fn new(alphabet: &Alphabet, long_word_min_len: usize) -> Self {
        let cases = ComparisonCase::applicable(alphabet);
        let mut matrices = Vec::new();
        for &case in &cases {
            let symbols = match case {
                ComparisonCase::CaseSensitive => alphabet.symbols(),
                ComparisonCase::CaseFolded => alphabet.folded_symbols(),
            };
            for stratum in MATRIX_STRATA {
                matrices.push(CaseMatrix {
                    case,
                    stratum,
                    matrix: ConfusionMatrix::new(symbols),
                });
            }
        }

        Self {
            cases,
            long_word_min_len,
            matrices,
            mistakes: Vec::new(),
            pairs: 0,
        }
    }

    /// Align one pair under every case and tally its operations
    pub fn add(&mut self, pair: &SamplePair) {
        let is_long = LengthStratum::classify(pair.target_len(), self.long_word_min_len) == LengthStratum::Long;

        // The first case is the strictest one available
        if let Some(&strictest) = self.cases.first() {
            let predicted = strictest.prepare(&pair.predicted);
            let target = strictest.prepare(&pair.target);
            if predicted != target {
                debug!("Mistake in '{}': {:?} != {:?}", pair.identifier, predicted, target);
                self.mistakes.push(Mistake {
                    identifier: pair.identifier.clone(),
                    predicted: predicted.into_owned(),
                    target: target.into_owned(),
                });
            }
        }

        for &case in &self.cases {
            let pred: Vec<char> = case.prepare(&pair.predicted).chars().collect();
            let target: Vec<char> = case.prepare(&pair.target).chars().collect();
            let alignment = align_chars(&pred, &target);

            for entry in self.matrices.iter_mut().filter(|m| m.case == case) {
                if entry.stratum == LengthStratum::All || (is_long && entry.stratum == LengthStratum::Long) {
                    entry.matrix.record(&pred, &target, &alignment.ops);
                }
            }
        }

        self.pairs += 1;
    }

    /// Cases with matrices, in report order
    pub fn cases(&self) -> &[ComparisonCase] {
        &self.cases
    }

    pub fn matrix(&self, case: ComparisonCase, stratum: LengthStratum) -> Option<&ConfusionMatrix> {
        self.matrices
            .iter()
            .find(|m| m.case == case && m.stratum == stratum)
            .map(|m| &m.matrix)
    }

    /// Every `(case, stratum, matrix)` in report order
    pub fn matrices(&self) -> impl Iterator<Item = (ComparisonCase, LengthStratum, &ConfusionMatrix)> {
        self.matrices.iter().map(|m| (m.case, m.stratum, &m.matrix))
    }

    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    /// Number of pairs added
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Operations dropped across all matrices for touching unknown characters
    pub fn unmapped(&self) -> u64 {
        self.matrices.iter().map(|m| m.matrix.unmapped()).sum()
    }
}
