//! Airgap Repo - upstream dependency descriptor lookups
//!
//! Each Kubernetes release pins its infrastructure images in
//! `build/dependencies.yaml`. This crate fetches that descriptor per release
//! to find the matching pause image version, from GitHub or from a mirror
//! for restricted network zones.

pub mod dependencies;
pub mod error;

pub use dependencies::{Dependency, DependencyDescriptor, DependencyResolver};
pub use error::{DependencyError, Result};
