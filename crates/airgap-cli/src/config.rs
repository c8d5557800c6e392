//! Run configuration
//!
//! Every setting can be given as a flag or through the environment variable
//! the bundle build scripts already export.

use std::path::{Path, PathBuf};

use airgap_core::{Mode, PackageOption, SprayRelease, Zone};
use clap::Args;

use crate::error::{CliError, Result};

/// Container image inspection tool the packager relies on
pub const IMAGE_TOOL: &str = "skopeo";

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Build mode: INCR collects only manifest components, FULL adds everything else
    #[arg(long, env = "MODE", default_value = "INCR", global = true)]
    pub mode: Mode,

    /// Network zone: DEFAULT or CN (mirror for dependency descriptors)
    #[arg(long, env = "ZONE", default_value = "DEFAULT", global = true)]
    pub zone: Zone,

    /// Packaging option: all, create_files or create_images
    #[arg(long, env = "OPTION", default_value = "all", global = true)]
    pub option: PackageOption,

    /// Kubespray release recorded in the LocalArtifactSet
    #[arg(long, env = "SPRAY_RELEASE", global = true)]
    pub spray_release: Option<String>,

    /// Kubespray commit recorded in the LocalArtifactSet name
    #[arg(long, env = "SPRAY_COMMIT", global = true)]
    pub spray_commit: Option<String>,

    /// Version manifest
    #[arg(long, env = "MANIFEST_CONF", default_value = "manifest.yml", global = true)]
    pub manifest: PathBuf,

    /// LocalArtifactSet template
    #[arg(
        long,
        env = "OFFLINEVERSION_CR_TEMPLATE",
        default_value = "artifacts/template/localartifactset.template.yml",
        global = true
    )]
    pub cr_template: PathBuf,

    /// Kubespray checkout
    #[arg(long, env = "SPRAY_REPO_PATH", default_value = "kubespray", global = true)]
    pub spray_repo: PathBuf,

    /// Output directory for packages and the LocalArtifactSet
    #[arg(long, env = "KUBEAN_TAG", default_value = "airgap_patch", global = true)]
    pub tag: String,

    /// Packaging script
    #[arg(
        long,
        env = "GEN_AIRGAP_PKGS",
        default_value = airgap_engine::packager::GEN_AIRGAP_PKGS_SCRIPT,
        global = true
    )]
    pub pkgs_script: PathBuf,

    /// Override the dependency descriptor URL; `{version}` is replaced by the Kubernetes version
    #[arg(long, env = "DEPENDENCIES_URL_TEMPLATE", global = true)]
    pub descriptor_url: Option<String>,
}

impl Settings {
    pub fn release(&self) -> SprayRelease {
        SprayRelease::new(self.spray_release.clone(), self.spray_commit.clone())
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.tag)
    }
}

/// Verify the Kubespray checkout, the image tool and, when packaging, the
/// packager script
pub fn check_environment(settings: &Settings, packaging: bool) -> Result<()> {
    if !settings.spray_repo.is_dir() {
        return Err(CliError::config_with_help(
            format!("kubespray repo path not found: {}", settings.spray_repo.display()),
            "clone Kubespray there or point SPRAY_REPO_PATH at a checkout",
        ));
    }

    if find_in_path(IMAGE_TOOL).is_none() {
        return Err(CliError::config_with_help(
            format!("{} command not found", IMAGE_TOOL),
            format!("install {} and make sure it is on PATH", IMAGE_TOOL),
        ));
    }

    if packaging && !settings.pkgs_script.is_file() {
        return Err(CliError::config_with_help(
            format!("packaging script not found: {}", settings.pkgs_script.display()),
            "run from the repository root or set GEN_AIRGAP_PKGS",
        ));
    }

    Ok(())
}

/// Locate an executable on PATH
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
