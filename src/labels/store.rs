//! Tab-separated label file loading

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use super::Alphabet;
use crate::error::EvalError;

/// Labels keyed by sample identifier (the image file name)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelStore {
    entries: BTreeMap<String, String>,
    /// Records dropped for an empty or out-of-alphabet label
    skipped: usize,
    /// Records that replaced an earlier one with the same identifier
    overwritten: usize,
}

impl LabelStore {
    /// Load a label file from disk
    pub fn load(path: &Path, alphabet: &Alphabet) -> Result<Self, EvalError> {
        let file = File::open(path).map_err(|e| EvalError::io(path, e))?;
        let store = Self::parse(BufReader::new(file), path, alphabet)?;

        info!(
            "Loaded {} labels from {:?} ({} skipped, {} overwritten)",
            store.len(),
            path,
            store.skipped(),
            store.overwritten()
        );
        Ok(store)
    }

    /// Parse label records from a reader; `path` is used in diagnostics only
    pub fn parse<R: BufRead>(reader: R, path: &Path, alphabet: &Alphabet) -> Result<Self, EvalError> {
        let mut store = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| EvalError::io(path, e))?;
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let (image_path, label) = match (fields.next(), fields.next()) {
                (Some(image_path), Some(label)) => (image_path, label),
                _ => {
                    return Err(EvalError::Format {
                        path: path.to_path_buf(),
                        line: index + 1,
                    })
                }
            };

            if label.is_empty() || !alphabet.admits(label) {
                debug!("Skipping '{}': label {:?} outside alphabet", image_path, label);
                store.skipped += 1;
                continue;
            }

            store.insert(basename(image_path), label);
        }

        Ok(store)
    }

    fn insert(&mut self, identifier: &str, label: &str) {
        if let Some(previous) = self.entries.insert(identifier.to_string(), label.to_string()) {
            warn!(
                "Duplicate sample '{}': label {:?} replaced by {:?}",
                identifier, previous, label
            );
            self.overwritten += 1;
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Iterate over `(identifier, label)` in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn overwritten(&self) -> usize {
        self.overwritten
    }
}

/// Sample identifier for an image path: its final path component.
///
/// Both `/` and `\` separate components, so identifiers do not depend on
/// the platform that produced the file.
pub fn basename(image_path: &str) -> &str {
    let trimmed = image_path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(content: &str) -> Result<LabelStore, EvalError> {
        LabelStore::parse(content.as_bytes(), Path::new("labels.txt"), &Alphabet::default())
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("data/test/img_1.png"), "img_1.png");
        assert_eq!(basename("img_1.png"), "img_1.png");
        assert_eq!(basename(r"C:\data\img_1.png"), "img_1.png");
        assert_eq!(basename("data/test/"), "test");
    }

    #[test]
    fn test_parse_basic_records() {
        let store = parse("a/1.png\tHello\nb/2.png\tWorld\textra\tfields\n").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1.png"), Some("Hello"));
        assert_eq!(store.get("2.png"), Some("World"));
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let store = parse("\n1.png\tfoo\r\n\n2.png\tbar\n").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1.png"), Some("foo"));
    }

    #[test]
    fn test_line_without_tab_is_format_error() {
        let err = parse("1.png\tfoo\nbroken line\n").unwrap_err();
        match err {
            EvalError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_alphabet_labels_skipped() {
        let store = parse("1.png\théllo\n2.png\thello\n3.png\t\n").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.skipped(), 2);
        assert!(store.get("1.png").is_none());
        assert!(store.get("3.png").is_none());
    }

    #[test]
    fn test_same_basename_last_write_wins() {
        let store = parse("train/x.png\tfirst\ntest/x.png\tsecond\n").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x.png"), Some("second"));
        assert_eq!(store.overwritten(), 1);
    }

    #[test]
    fn test_load_file_twice_is_identical() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "imgs/1.png\tCat").unwrap();
        writeln!(temp_file, "imgs/2.png\tdog-3").unwrap();
        writeln!(temp_file, "imgs/3.png\tnaïve").unwrap();

        let alphabet = Alphabet::default();
        let first = LabelStore::load(temp_file.path(), &alphabet).unwrap();
        let second = LabelStore::load(temp_file.path(), &alphabet).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = LabelStore::load(Path::new("/nonexistent/labels.txt"), &Alphabet::default());
        assert!(matches!(result, Err(EvalError::Io { .. })));
    }
}
