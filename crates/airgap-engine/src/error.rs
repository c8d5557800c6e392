//! Engine error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("List generator failed for {arch} (exit code {code:?})")]
    GeneratorFailed {
        arch: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Candidate list not found: {path}")]
    MissingCandidateList { path: PathBuf },

    #[error("Script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    #[error("Packaging step '{step}' failed for {arch} (exit code {code:?})")]
    PackagerFailed {
        step: String,
        arch: String,
        code: Option<i32>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Captured output of a failed generator run, if any
    pub fn captured_output(&self) -> Option<(&str, &str)> {
        match self {
            EngineError::GeneratorFailed { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
