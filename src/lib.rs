//! OCR evaluation engine
//!
//! Scores predicted text labels against ground truth: stratified accuracy,
//! normalized edit distance and per-character confusion matrices.

pub mod alignment;
pub mod app;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod labels;
pub mod report;

pub use error::EvalError;
