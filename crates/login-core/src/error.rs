//! Error types for step registration, matching and feature loading

use crate::step::StepKind;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StepError>;

#[derive(Error, Debug)]
pub enum StepError {
    #[error("Invalid step pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate {kind} step: {pattern}")]
    DuplicateStep { kind: StepKind, pattern: String },

    #[error("Undefined {kind} step: {text}")]
    UndefinedStep { kind: StepKind, text: String },

    #[error("Ambiguous {kind} step '{text}' matches: {}", .candidates.join(", "))]
    AmbiguousStep {
        kind: StepKind,
        text: String,
        candidates: Vec<String>,
    },

    #[error("Feature parse error on line {line}: {reason}")]
    FeatureParse { line: usize, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
