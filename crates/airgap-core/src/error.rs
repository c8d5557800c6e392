//! Core error types

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ValidationReport;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Manifest is empty: {path}")]
    ManifestEmpty { path: PathBuf },

    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Manifest validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Manifest has no list-valued version entry to size the job plan")]
    NoVersionLists,

    #[error("CR template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("Invalid CR template: {message}")]
    InvalidTemplate { message: String },

    #[error("Invalid {kind} '{value}', expected one of: {expected}")]
    InvalidOption {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
