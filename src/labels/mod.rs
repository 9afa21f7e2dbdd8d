//! Label Layer
//!
//! Reads prediction and ground-truth label files and filters them
//! against the configured alphabet.

pub mod alphabet;
pub mod store;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use store::{basename, LabelStore};
