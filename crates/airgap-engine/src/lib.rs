//! Airgap Engine - batch artifact resolution
//!
//! Runs a [`JobPlan`](airgap_core::JobPlan) against the external list
//! generator, selects matching file and image URLs per architecture and hands
//! the deduplicated lists to a packager.
//!
//! Both external collaborators sit behind traits:
//! - [`ListGenerator`]: produces candidate lists (`generate_list.sh`)
//! - [`Packager`]: consumes final lists (`gen_airgap_pkgs.sh`)
//!
//! Execution is strictly sequential; each architecture and job waits for the
//! previous one to finish.

pub mod batch;
pub mod error;
pub mod generator;
pub mod packager;

pub use batch::{BatchResolver, ResolvedArtifactSet};
pub use error::{EngineError, Result};
pub use generator::{CandidateLists, ListGenerator, ScriptListGenerator};
pub use packager::{Packager, ScriptPackager};
