//! CLI error types with exit code handling
//!
//! Library errors are folded into one diagnostic type whose variant decides
//! the process exit code.

use airgap_core::CoreError;
use airgap_engine::EngineError;
use airgap_repo::DependencyError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Missing checkout, tool, manifest or template
    #[error("Configuration error: {message}")]
    #[diagnostic(code(airgap::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Manifest rejected
    #[error("Validation failed: {message}")]
    #[diagnostic(code(airgap::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Upstream dependency descriptor could not be resolved
    #[error("Dependency resolution failed: {message}")]
    #[diagnostic(
        code(airgap::cli::dependency),
        help("check network access to the descriptor endpoint, or try --zone CN")
    )]
    Dependency { message: String },

    /// List generator or packager failed
    #[error("External process failed: {message}")]
    #[diagnostic(code(airgap::cli::process))]
    Process {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(airgap::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(airgap::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Dependency { .. } => exit_codes::DEPENDENCY_ERROR,
            CliError::Process { .. } => exit_codes::PROCESS_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ManifestNotFound { .. } | CoreError::ManifestEmpty { .. } => {
                CliError::config_with_help(
                    err.to_string(),
                    "set MANIFEST_CONF or --manifest to a non-empty manifest.yml",
                )
            }
            CoreError::TemplateNotFound { .. } => CliError::config_with_help(
                err.to_string(),
                "set OFFLINEVERSION_CR_TEMPLATE or --cr-template to a LocalArtifactSet template",
            ),
            CoreError::InvalidTemplate { .. } | CoreError::InvalidOption { .. } => {
                CliError::Config {
                    message: err.to_string(),
                    help: None,
                }
            }
            CoreError::Validation(report) => {
                let hints: Vec<String> = report
                    .unrecognized
                    .iter()
                    .filter_map(|k| k.suggestion.as_ref().map(|s| format!("{} -> {}", k.key, s)))
                    .collect();
                CliError::Validation {
                    message: report.to_string(),
                    help: (!hints.is_empty()).then(|| format!("did you mean: {}", hints.join(", "))),
                }
            }
            CoreError::InvalidManifest { .. } | CoreError::YamlParse(_) => CliError::Validation {
                message: err.to_string(),
                help: None,
            },
            CoreError::NoVersionLists => CliError::internal(err.to_string()),
            CoreError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
        }
    }
}

impl From<DependencyError> for CliError {
    fn from(err: DependencyError) -> Self {
        CliError::Dependency {
            message: err.to_string(),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ScriptNotFound { .. } => CliError::Config {
                message: err.to_string(),
                help: None,
            },
            EngineError::MissingCandidateList { .. } => CliError::Process {
                message: err.to_string(),
                help: Some("generate_list.sh exited successfully but wrote no list".to_string()),
            },
            EngineError::GeneratorFailed { .. } | EngineError::PackagerFailed { .. } => {
                CliError::Process {
                    message: err.to_string(),
                    help: None,
                }
            }
            EngineError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
