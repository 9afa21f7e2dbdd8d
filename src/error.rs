//! Error types for label loading and scoring

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of an evaluation run
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to read label file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record in '{}' at line {line}: expected '<image_path>\\t<label>'", .path.display())]
    Format { path: PathBuf, line: usize },
    #[error("no prediction for target sample '{identifier}'")]
    MissingPrediction { identifier: String },
    #[error("target label for sample '{identifier}' is empty")]
    EmptyTargetLabel { identifier: String },
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
