//! Levenshtein alignment between a predicted and a target string
//!
//! Operations are expressed as edits that turn the prediction into the
//! target. Positions count Unicode scalar values, not bytes.

/// Kind of a single edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Target character missing from the prediction
    Insert,
    /// Prediction character absent from the target
    Delete,
    /// Prediction character replaced by a target character
    Substitute,
}

/// One edit operation with its positions in both strings
///
/// For `Insert`, `pred` is the insertion point; for `Delete`, `target` is
/// the position in the target where the deleted character would have been.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditOp {
    pub kind: EditKind,
    pub pred: usize,
    pub target: usize,
}

/// Minimal alignment of two strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub distance: usize,
    /// Operations in left-to-right order; `ops.len() == distance`
    pub ops: Vec<EditOp>,
}

/// Levenshtein distance between two strings
pub fn distance(pred: &str, target: &str) -> usize {
    strsim::levenshtein(pred, target)
}

/// Compute a minimal alignment of `pred` onto `target`
pub fn align(pred: &str, target: &str) -> Alignment {
    let pred: Vec<char> = pred.chars().collect();
    let target: Vec<char> = target.chars().collect();
    align_chars(&pred, &target)
}

/// Compute a minimal alignment over pre-split characters.
///
/// Backtrace prefers, in order: match, substitution, deletion, insertion.
pub fn align_chars(pred: &[char], target: &[char]) -> Alignment {
    let len_p = pred.len();
    let len_t = target.len();

    let mut matrix = vec![vec![0usize; len_t + 1]; len_p + 1];

    for i in 0..=len_p { matrix[i][0] = i; }
    for j in 0..=len_t { matrix[0][j] = j; }

    for i in 1..=len_p {
        for j in 1..=len_t {
            let cost = if pred[i - 1] == target[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    let mut ops = Vec::with_capacity(matrix[len_p][len_t]);
    let (mut i, mut j) = (len_p, len_t);
    while i > 0 || j > 0 {
        let current = matrix[i][j];
        if i > 0 && j > 0 && pred[i - 1] == target[j - 1] && current == matrix[i - 1][j - 1] {
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && current == matrix[i - 1][j - 1] + 1 {
            i -= 1;
            j -= 1;
            ops.push(EditOp { kind: EditKind::Substitute, pred: i, target: j });
        } else if i > 0 && current == matrix[i - 1][j] + 1 {
            i -= 1;
            ops.push(EditOp { kind: EditKind::Delete, pred: i, target: j });
        } else {
            j -= 1;
            ops.push(EditOp { kind: EditKind::Insert, pred: i, target: j });
        }
    }
    ops.reverse();

    Alignment {
        distance: matrix[len_p][len_t],
        ops,
    }
}
