//! Version manifest
//!
//! The manifest is a flat YAML mapping from component key to either a single
//! version or a list of versions:
//!
//! ```yaml
//! image_arch: [amd64, arm64]
//! kube_version: [v1.27.5, v1.28.2]
//! etcd_version: v3.5.9
//! ```
//!
//! Key order is preserved so that generator invocations are reproducible.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use crate::error::{CoreError, Result};
use crate::keywords::{IMAGE_ARCH_KEY, KUBE_VERSION_KEY, KeywordTable, POD_INFRA_VERSION_KEY};

/// Architecture used when the manifest names none
pub const DEFAULT_ARCH: &str = "amd64";

/// A manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VersionValue {
    Single(String),
    List(Vec<String>),
}

impl VersionValue {
    /// Coerce to a sequence; a single value becomes a one-element list
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            VersionValue::Single(v) => vec![v.clone()],
            VersionValue::List(vs) => vs.clone(),
        }
    }

    /// Value contributed to job `index`, if any
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            VersionValue::Single(v) if index == 0 => Some(v),
            VersionValue::Single(_) => None,
            VersionValue::List(vs) => vs.get(index).map(String::as_str),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, VersionValue::List(_))
    }
}

impl From<&str> for VersionValue {
    fn from(v: &str) -> Self {
        VersionValue::Single(v.to_string())
    }
}

impl From<Vec<String>> for VersionValue {
    fn from(vs: Vec<String>) -> Self {
        VersionValue::List(vs)
    }
}

/// A manifest key outside the known taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedKey {
    pub key: String,
    /// Closest known key, when one is near enough to be a typo
    pub suggestion: Option<String>,
}

impl fmt::Display for UnrecognizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "unknown component version key: {} (did you mean {}?)", self.key, s),
            None => write!(f, "unknown component version key: {}", self.key),
        }
    }
}

/// Outcome of checking a manifest against a keyword table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub unrecognized: Vec<UnrecognizedKey>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.unrecognized.is_empty()
    }

    /// Turn a failing report into an error
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.unrecognized.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Parsed version manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionManifest {
    entries: IndexMap<String, VersionValue>,
}

impl VersionManifest {
    /// Load a manifest file, rejecting missing or blank files
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(CoreError::ManifestEmpty {
                path: path.to_path_buf(),
            });
        }
        Self::from_yaml(&content)
    }

    /// Parse manifest YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(content)?;
        let Value::Mapping(map) = doc else {
            return Err(CoreError::InvalidManifest {
                message: "top level must be a mapping of component keys".to_string(),
            });
        };

        let mut entries = IndexMap::new();
        for (key, value) in map {
            let key = scalar_to_string(&key).ok_or_else(|| CoreError::InvalidManifest {
                message: format!("non-scalar key {:?}", key),
            })?;
            let value = match value {
                Value::Null => continue,
                Value::Sequence(items) => {
                    let versions = items
                        .iter()
                        .map(|item| {
                            scalar_to_string(item).ok_or_else(|| CoreError::InvalidManifest {
                                message: format!("{} contains a non-scalar entry", key),
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    VersionValue::List(versions)
                }
                other => {
                    let v = scalar_to_string(&other).ok_or_else(|| CoreError::InvalidManifest {
                        message: format!("{} must be a version or a list of versions", key),
                    })?;
                    VersionValue::Single(v)
                }
            };
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Check every key against the taxonomy, collecting all offenders
    pub fn validate(&self, table: &KeywordTable) -> ValidationReport {
        let known: Vec<&str> = std::iter::once(IMAGE_ARCH_KEY)
            .chain(table.component_keys())
            .collect();

        let unrecognized = self
            .entries
            .keys()
            .filter(|key| !table.is_known_key(key))
            .map(|key| UnrecognizedKey {
                key: key.clone(),
                suggestion: closest_key(key, &known),
            })
            .collect();

        ValidationReport { unrecognized }
    }

    pub fn get(&self, key: &str) -> Option<&VersionValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a value; an existing key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<VersionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Versioned components in manifest order (everything but `image_arch`)
    pub fn components(&self) -> impl Iterator<Item = (&str, &VersionValue)> {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != IMAGE_ARCH_KEY)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Target architectures, `["amd64"]` when absent
    pub fn architectures(&self) -> Vec<String> {
        self.get(IMAGE_ARCH_KEY)
            .map(VersionValue::to_vec)
            .unwrap_or_else(|| vec![DEFAULT_ARCH.to_string()])
    }

    /// Kubernetes versions named by the manifest
    pub fn kube_versions(&self) -> Vec<String> {
        self.get(KUBE_VERSION_KEY)
            .map(VersionValue::to_vec)
            .unwrap_or_default()
    }

    /// Record resolved pause image versions, replacing any manual value
    pub fn set_pod_infra_versions(&mut self, versions: Vec<String>) {
        self.insert(POD_INFRA_VERSION_KEY, versions);
    }

    /// Whether any entry, `image_arch` included, is list-valued
    pub fn has_list(&self) -> bool {
        self.entries.values().any(VersionValue::is_list)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn closest_key(key: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|k| (strsim::levenshtein(key, k), *k))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, k)| k.to_string())
}
