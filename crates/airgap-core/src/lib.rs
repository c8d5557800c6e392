//! Airgap Core - Manifest model and job planning for air-gapped Kubespray bundles
//!
//! This crate provides the pure parts of bundle generation:
//! - `VersionManifest`: the per-component version manifest and its validation
//! - `KeywordTable`: component key to artifact-name keyword taxonomy
//! - `JobCompiler`: expands a manifest into per-version generation jobs
//! - `filter_by_keywords`: substring selection over candidate lists
//! - `CrEmitter`: stamps resolved versions onto a LocalArtifactSet resource

pub mod cr;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod manifest;
pub mod options;
pub mod plan;

pub use cr::{CrEmitter, LocalArtifactSet, SprayRelease, VersionRangeItem, unix_timestamp};
pub use error::{CoreError, Result};
pub use filter::filter_by_keywords;
pub use keywords::{KeywordTable, component_name};
pub use manifest::{UnrecognizedKey, ValidationReport, VersionManifest, VersionValue};
pub use options::{Mode, PackageOption, Zone};
pub use plan::{Job, JobCompiler, JobPlan};
