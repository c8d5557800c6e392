//! Candidate list generation
//!
//! The list generator is Kubespray's `contrib/offline/generate_list.sh`. It
//! renders every file and image URL the playbooks could download for the
//! given variables into `contrib/offline/temp/{files,images}.list`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{EngineError, Result};

/// Generator script, relative to the Kubespray checkout
pub const GENERATE_LIST_SCRIPT: &str = "contrib/offline/generate_list.sh";

/// Output directory of the generator, relative to the Kubespray checkout
pub const OFFLINE_TEMP_DIR: &str = "contrib/offline/temp";

pub const FILES_LIST: &str = "files.list";
pub const IMAGES_LIST: &str = "images.list";

/// The two line-oriented lists produced per generator run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateLists {
    pub files: Vec<String>,
    pub images: Vec<String>,
}

/// Produces candidate lists for one architecture and variable set
#[async_trait]
pub trait ListGenerator: Send {
    async fn generate(&mut self, arch: &str, extra_vars: &[String]) -> Result<CandidateLists>;
}

/// Runs `generate_list.sh` inside a Kubespray checkout
#[derive(Debug, Clone)]
pub struct ScriptListGenerator {
    spray_repo: PathBuf,
}

impl ScriptListGenerator {
    pub fn new(spray_repo: impl Into<PathBuf>) -> Self {
        Self {
            spray_repo: spray_repo.into(),
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.spray_repo.join(OFFLINE_TEMP_DIR)
    }

    /// Command line arguments after `bash`
    pub fn args(arch: &str, extra_vars: &[String]) -> Vec<String> {
        let mut args = vec![
            GENERATE_LIST_SCRIPT.to_string(),
            "-e".to_string(),
            airgap_core::plan::extra_var("image_arch", arch),
        ];
        for var in extra_vars {
            args.push("-e".to_string());
            args.push(var.clone());
        }
        args
    }
}

#[async_trait]
impl ListGenerator for ScriptListGenerator {
    async fn generate(&mut self, arch: &str, extra_vars: &[String]) -> Result<CandidateLists> {
        let temp_dir = self.temp_dir();
        if temp_dir.exists() {
            tokio::fs::remove_dir_all(&temp_dir).await?;
        }

        let args = Self::args(arch, extra_vars);
        tracing::info!(arch = %arch, cmd = ?args, "generating candidate lists");

        let output = Command::new("bash")
            .args(&args)
            .current_dir(&self.spray_repo)
            .output()
            .await?;

        if !output.status.success() {
            return Err(EngineError::GeneratorFailed {
                arch: arch.to_string(),
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(CandidateLists {
            files: read_lines(&temp_dir.join(FILES_LIST)).await?,
            images: read_lines(&temp_dir.join(IMAGES_LIST)).await?,
        })
    }
}

async fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(EngineError::MissingCandidateList {
            path: path.to_path_buf(),
        });
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content.lines().map(|l| l.trim_end().to_string()).collect())
}
