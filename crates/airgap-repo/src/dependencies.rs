//! Kubernetes `build/dependencies.yaml` lookups

use std::time::Duration;

use airgap_core::Zone;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{DependencyError, Result};

/// Descriptor location on GitHub; `{version}` is a Kubernetes git ref
pub const DEFAULT_DESCRIPTOR_URL: &str =
    "https://raw.githubusercontent.com/kubernetes/kubernetes/{version}/build/dependencies.yaml";

/// Descriptor location on the mirror used for the CN zone
pub const CN_DESCRIPTOR_URL: &str =
    "https://gitee.com/mirrors/kubernetes/raw/{version}/build/dependencies.yaml";

/// Dependency names that identify the pause image
pub const PAUSE_IMAGE_NAMES: [&str; 2] = ["k8s.gcr.io/pause", "registry.k8s.io/pause"];

pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A parsed `dependencies.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyDescriptor {
    pub dependencies: Option<Vec<Dependency>>,
}

/// One pinned dependency
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dependency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: Value,
}

impl Dependency {
    /// Version rendered as text; YAML numbers such as `3.9` are accepted
    pub fn version_string(&self) -> Option<String> {
        match &self.version {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn is_pause_image(&self) -> bool {
        PAUSE_IMAGE_NAMES.contains(&self.name.as_str())
    }
}

impl DependencyDescriptor {
    pub fn from_yaml(content: &str, url: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| DependencyError::ParseError {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Versions of every pause image entry, in descriptor order
    pub fn pause_versions(&self, url: &str) -> Result<Vec<String>> {
        let dependencies =
            self.dependencies
                .as_ref()
                .ok_or_else(|| DependencyError::MissingDependencies {
                    url: url.to_string(),
                })?;

        Ok(dependencies
            .iter()
            .filter(|d| d.is_pause_image())
            .filter_map(Dependency::version_string)
            .collect())
    }
}

/// Resolves pause image versions for Kubernetes releases
pub struct DependencyResolver {
    client: reqwest::Client,
    url_template: String,
}

impl DependencyResolver {
    /// Resolver for the descriptor endpoint of `zone`
    pub fn for_zone(zone: Zone) -> Result<Self> {
        let template = match zone {
            Zone::Default => DEFAULT_DESCRIPTOR_URL,
            Zone::Cn => CN_DESCRIPTOR_URL,
        };
        Self::with_url_template(template)
    }

    /// Resolver for a custom endpoint; `{version}` is replaced per release
    pub fn with_url_template(template: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DependencyError::ClientError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url_template: template.into(),
        })
    }

    /// Descriptor URL for a Kubernetes version
    pub fn descriptor_url(&self, kube_version: &str) -> String {
        self.url_template.replace("{version}", kube_version)
    }

    /// Fetch and parse the descriptor of one release
    pub async fn fetch_descriptor(&self, kube_version: &str) -> Result<DependencyDescriptor> {
        let url = self.descriptor_url(kube_version);
        tracing::info!(url = %url, "fetching dependency descriptor");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DependencyError::HttpError {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        DependencyDescriptor::from_yaml(&body, &url)
    }

    /// Pause versions for each release, one lookup at a time
    ///
    /// Duplicates across releases are kept.
    pub async fn pod_infra_versions(&self, kube_versions: &[String]) -> Result<Vec<String>> {
        let mut versions = Vec::new();
        for kube_version in kube_versions {
            let descriptor = self.fetch_descriptor(kube_version).await?;
            let found = descriptor.pause_versions(&self.descriptor_url(kube_version))?;
            tracing::debug!(kube_version = %kube_version, pause = ?found, "resolved pause versions");
            versions.extend(found);
        }
        Ok(versions)
    }
}
