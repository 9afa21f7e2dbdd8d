//! Admissible character set for labels

use std::collections::HashSet;

/// Characters accepted by default: punctuation, digits and Latin letters
pub const DEFAULT_ALPHABET: &str =
    "'-.0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ordered set of characters a label may contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    /// Characters in configured order, duplicates removed
    symbols: Vec<char>,
    /// Lowercase projection of `symbols`, duplicates removed
    folded: Vec<char>,
    /// Lookup set over `folded`
    folded_set: HashSet<char>,
    /// Whether any symbol changes when lowercased
    case_sensitive: bool,
}

impl Alphabet {
    /// Build an alphabet from a raw string of characters
    pub fn new(chars: &str) -> Self {
        let symbols = dedup(chars.chars());
        let folded = dedup(symbols.iter().flat_map(|c| c.to_lowercase()));
        let folded_set = folded.iter().copied().collect();
        let case_sensitive = symbols
            .iter()
            .any(|&c| c.to_lowercase().to_string() != c.to_string());

        Self {
            symbols,
            folded,
            folded_set,
            case_sensitive,
        }
    }

    /// Characters in configured order
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Lowercased characters in configured order
    pub fn folded_symbols(&self) -> &[char] {
        &self.folded
    }

    /// True when the alphabet distinguishes letter case
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Check a label against the alphabet, ignoring letter case
    pub fn admits(&self, label: &str) -> bool {
        label
            .to_lowercase()
            .chars()
            .all(|c| self.folded_set.contains(&c))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }
}

fn dedup(chars: impl Iterator<Item = char>) -> Vec<char> {
    let mut seen = HashSet::new();
    chars.filter(|c| seen.insert(*c)).collect()
}
