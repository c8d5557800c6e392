//! LocalArtifactSet custom resource
//!
//! A bundle run records which component versions it packaged by stamping the
//! manifest's versions onto a LocalArtifactSet template:
//!
//! ```yaml
//! apiVersion: kubean.io/v1alpha1
//! kind: LocalArtifactSet
//! metadata:
//!   name: localartifactset-template
//! spec:
//!   docker: []
//!   items:
//!     - name: kube
//!       versionRange: []
//! ```
//!
//! Fields the emitter does not manage are carried through untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::{CoreError, Result};
use crate::keywords::{KUBE_VERSION_KEY, KeywordTable, component_name};
use crate::manifest::VersionManifest;
use crate::options::Mode;

/// Label recording the Kubespray release a bundle was built from
pub const SPRAY_RELEASE_LABEL: &str = "kubean.io/sprayRelease";

/// File name of the emitted resource inside the output directory
pub const CR_FILE_NAME: &str = "localartifactset.cr.yaml";

/// Version range written for unlisted components in a full build
pub const DEFAULT_VERSION: &str = "default";

const NAME_PREFIX: &str = "localartifactset";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalArtifactSet {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: LocalArtifactSetSpec,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalArtifactSetSpec {
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub docker: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<VersionRangeItem>,
}

/// Versions of one component shipped in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRangeItem {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version_range: Vec<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl LocalArtifactSet {
    /// Load a template resource
    pub fn load_template(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CoreError::InvalidTemplate {
            message: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Find an item by component name
    pub fn item(&self, name: &str) -> Option<&VersionRangeItem> {
        self.spec.items.iter().find(|i| i.name == name)
    }

    /// Write into `dir` as `localartifactset.cr.yaml`, replacing any previous file
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CR_FILE_NAME);
        std::fs::write(&path, self.to_yaml()?)?;
        Ok(path)
    }
}

/// Release identity stamped into the resource name and labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprayRelease {
    pub release: Option<String>,
    pub commit: Option<String>,
}

impl SprayRelease {
    pub fn new(release: Option<String>, commit: Option<String>) -> Self {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Self {
            release: non_empty(release),
            commit: non_empty(commit),
        }
    }

    /// Resource name for a run at `timestamp` (unix seconds)
    pub fn resource_name(&self, timestamp: i64) -> String {
        match (&self.release, &self.commit) {
            (Some(release), Some(commit)) => {
                format!("{}-{}-{}-{}", NAME_PREFIX, release, commit, timestamp)
            }
            (Some(release), None) => format!("{}-{}-{}", NAME_PREFIX, release, timestamp),
            (None, _) => format!("{}-patch-{}", NAME_PREFIX, timestamp),
        }
    }

    /// Value of the release label
    pub fn label(&self) -> &str {
        self.release.as_deref().unwrap_or("master")
    }
}

/// Stamps manifest versions onto LocalArtifactSet templates
#[derive(Debug, Clone, Copy)]
pub struct CrEmitter<'a> {
    table: &'a KeywordTable,
    mode: Mode,
}

impl<'a> CrEmitter<'a> {
    pub fn new(table: &'a KeywordTable, mode: Mode) -> Self {
        Self { table, mode }
    }

    /// Produce the resource for this run
    pub fn emit(
        &self,
        mut template: LocalArtifactSet,
        manifest: &VersionManifest,
        release: &SprayRelease,
        timestamp: i64,
    ) -> LocalArtifactSet {
        template.spec.docker.clear();
        template.metadata.name = release.resource_name(timestamp);
        template.metadata.labels =
            BTreeMap::from([(SPRAY_RELEASE_LABEL.to_string(), release.label().to_string())]);

        for item in &mut template.spec.items {
            let Some(key) = self
                .table
                .component_keys()
                .find(|key| component_name(key) == item.name)
            else {
                continue;
            };

            match manifest.get(key) {
                Some(value) => item.version_range = value.to_vec(),
                None if self.mode.is_full() && key != KUBE_VERSION_KEY => {
                    item.version_range = vec![DEFAULT_VERSION.to_string()];
                }
                None => {}
            }
        }

        template
    }
}

/// Current time as unix seconds, for resource naming
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"apiVersion: kubean.io/v1alpha1
kind: LocalArtifactSet
metadata:
  name: localartifactset-template
  labels:
    kubean.io/sprayRelease: v2.22.0
spec:
  arch: ["x86_64"]
  kubespray: v2.22.0
  docker:
    - os: redhat-7
      versionRange: ["20.10"]
  items:
    - name: kube
      versionRange: []
    - name: etcd
      versionRange: []
    - name: containerd
    - name: helm
      versionRange: ["v3.12.0"]
"#;

    fn emit(manifest: &str, mode: Mode, release: SprayRelease) -> LocalArtifactSet {
        let table = KeywordTable::kubespray();
        let manifest = VersionManifest::from_yaml(manifest).unwrap();
        let template = LocalArtifactSet::from_yaml(TEMPLATE).unwrap();
        CrEmitter::new(&table, mode).emit(template, &manifest, &release, 1700000000)
    }

    #[test]
    fn test_scalar_version_becomes_single_range() {
        let cr = emit("kube_version: \"1.28.0\"\n", Mode::Incr, SprayRelease::default());
        assert_eq!(cr.item("kube").unwrap().version_range, vec!["1.28.0".to_string()]);
    }

    #[test]
    fn test_list_version_is_copied() {
        let cr = emit(
            "kube_version: [v1.27.0, v1.28.0]\n",
            Mode::Incr,
            SprayRelease::default(),
        );
        assert_eq!(cr.item("kube").unwrap().version_range.len(), 2);
    }

    #[test]
    fn test_full_mode_defaults_missing_components() {
        let cr = emit("kube_version: v1.28.0\n", Mode::Full, SprayRelease::default());
        assert_eq!(cr.item("etcd").unwrap().version_range, vec!["default".to_string()]);
        assert_eq!(
            cr.item("containerd").unwrap().version_range,
            vec!["default".to_string()]
        );
    }

    #[test]
    fn test_incr_mode_leaves_missing_components() {
        let cr = emit("kube_version: v1.28.0\n", Mode::Incr, SprayRelease::default());
        assert!(cr.item("etcd").unwrap().version_range.is_empty());
    }

    #[test]
    fn test_full_mode_never_defaults_kube() {
        let cr = emit("etcd_version: v3.5.9\n", Mode::Full, SprayRelease::default());
        assert!(cr.item("kube").unwrap().version_range.is_empty());
    }

    #[test]
    fn test_unknown_items_are_untouched() {
        let cr = emit("kube_version: v1.28.0\n", Mode::Full, SprayRelease::default());
        assert_eq!(cr.item("helm").unwrap().version_range, vec!["v3.12.0".to_string()]);
    }

    #[test]
    fn test_docker_and_labels_are_reset() {
        let cr = emit("kube_version: v1.28.0\n", Mode::Incr, SprayRelease::default());
        assert!(cr.spec.docker.is_empty());
        assert_eq!(cr.metadata.labels.len(), 1);
        assert_eq!(cr.metadata.labels[SPRAY_RELEASE_LABEL], "master");
        assert_eq!(cr.metadata.name, "localartifactset-patch-1700000000");
    }

    #[test]
    fn test_release_naming() {
        let release = SprayRelease::new(Some("v2.23.0".into()), Some("a1b2c3d".into()));
        let cr = emit("kube_version: v1.28.0\n", Mode::Incr, release);
        insta::assert_snapshot!(cr.metadata.name, @"localartifactset-v2.23.0-a1b2c3d-1700000000");
        assert_eq!(cr.metadata.labels[SPRAY_RELEASE_LABEL], "v2.23.0");
    }

    #[test]
    fn test_empty_release_is_treated_as_absent() {
        let release = SprayRelease::new(Some(String::new()), Some("a1b2c3d".into()));
        assert_eq!(release.resource_name(1), "localartifactset-patch-1");
        assert_eq!(release.label(), "master");
    }

    #[test]
    fn test_unmanaged_fields_survive() {
        let cr = emit("kube_version: v1.28.0\n", Mode::Incr, SprayRelease::default());
        let yaml = cr.to_yaml().unwrap();
        let reparsed = LocalArtifactSet::from_yaml(&yaml).unwrap();

        assert_eq!(reparsed.api_version, "kubean.io/v1alpha1");
        assert_eq!(
            reparsed.spec.extra.get("kubespray"),
            Some(&Value::String("v2.22.0".to_string()))
        );
        assert!(yaml.contains("versionRange"));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("airgap_patch");
        let cr = emit("kube_version: v1.28.0\n", Mode::Incr, SprayRelease::default());

        let path = cr.write_to_dir(&out).unwrap();
        assert_eq!(path, out.join(CR_FILE_NAME));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("localartifactset-patch-1700000000"));
    }

    #[test]
    fn test_missing_template() {
        let dir = TempDir::new().unwrap();
        let err = LocalArtifactSet::load_template(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, CoreError::TemplateNotFound { .. }));
    }
}
