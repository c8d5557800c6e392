//! Artifact packaging
//!
//! Packaging is delegated to `gen_airgap_pkgs.sh`, which downloads the listed
//! files, copies the listed images with skopeo and archives the results under
//! the output tag directory.

use std::path::PathBuf;

use airgap_core::{PackageOption, Zone};
use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{EngineError, Result};
use crate::generator::{FILES_LIST, IMAGES_LIST, OFFLINE_TEMP_DIR};

/// Default packager script, relative to the working directory
pub const GEN_AIRGAP_PKGS_SCRIPT: &str = "artifacts/gen_airgap_pkgs.sh";

/// Consumes the final URL lists of one architecture
#[async_trait]
pub trait Packager: Send {
    async fn package(
        &mut self,
        arch: &str,
        option: PackageOption,
        files: &[String],
        images: &[String],
    ) -> Result<()>;
}

/// Runs `gen_airgap_pkgs.sh` with the lists written into the Kubespray temp dir
#[derive(Debug, Clone)]
pub struct ScriptPackager {
    script: PathBuf,
    spray_repo: PathBuf,
    tag: String,
    zone: Zone,
}

impl ScriptPackager {
    pub fn new(
        script: impl Into<PathBuf>,
        spray_repo: impl Into<PathBuf>,
        tag: impl Into<String>,
        zone: Zone,
    ) -> Self {
        Self {
            script: script.into(),
            spray_repo: spray_repo.into(),
            tag: tag.into(),
            zone,
        }
    }

    async fn write_list(&self, name: &str, urls: &[String]) -> Result<()> {
        let dir = self.spray_repo.join(OFFLINE_TEMP_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(name), urls.join("\n")).await?;
        Ok(())
    }

    /// Prepare the offline directory, then run one step
    async fn run_step(&self, arch: &str, step: &str) -> Result<()> {
        if !self.script.exists() {
            return Err(EngineError::ScriptNotFound {
                path: self.script.clone(),
            });
        }

        for arg in ["offline_dir", step] {
            tracing::info!(arch = %arch, step = %arg, "running packaging step");
            let status = Command::new("bash")
                .arg(&self.script)
                .arg(arg)
                .env("KUBEAN_TAG", &self.tag)
                .env("ARCH", arch)
                .env("ZONE", self.zone.to_string())
                .status()
                .await?;

            if !status.success() {
                return Err(EngineError::PackagerFailed {
                    step: arg.to_string(),
                    arch: arch.to_string(),
                    code: status.code(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Packager for ScriptPackager {
    async fn package(
        &mut self,
        arch: &str,
        option: PackageOption,
        files: &[String],
        images: &[String],
    ) -> Result<()> {
        if option.includes_files() {
            self.write_list(FILES_LIST, files).await?;
            self.run_step(arch, "files").await?;
        }
        if option.includes_images() {
            self.write_list(IMAGES_LIST, images).await?;
            self.run_step(arch, "images").await?;
        }
        if option == PackageOption::All {
            self.run_step(arch, "copy_import_sh").await?;
        }
        Ok(())
    }
}
