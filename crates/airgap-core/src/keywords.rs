//! Keyword taxonomy
//!
//! Maps each versioned component key of the manifest to the substrings that
//! identify its binaries and images in the generated candidate lists.

use indexmap::{IndexMap, IndexSet};

/// Manifest key listing target architectures
pub const IMAGE_ARCH_KEY: &str = "image_arch";

/// Manifest key holding Kubernetes versions
pub const KUBE_VERSION_KEY: &str = "kube_version";

/// Manifest key that receives resolved pause image versions
pub const POD_INFRA_VERSION_KEY: &str = "pod_infra_version";

/// Suffix shared by every versioned component key
pub const VERSION_SUFFIX: &str = "_version";

/// Immutable mapping from component key to artifact-name keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    components: IndexMap<String, Vec<String>>,
    auxiliary: Vec<String>,
}

impl KeywordTable {
    /// Build a table from explicit component keywords and auxiliary names
    pub fn new<K, V, A>(components: impl IntoIterator<Item = (K, V)>, auxiliary: A) -> Self
    where
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
            auxiliary: auxiliary.into_iter().map(Into::into).collect(),
        }
    }

    /// The taxonomy used for Kubespray offline lists
    pub fn kubespray() -> Self {
        Self::new(
            [
                (
                    KUBE_VERSION_KEY,
                    vec![
                        "kubelet",
                        "kubectl",
                        "kubeadm",
                        "kube-apiserver",
                        "kube-controller-manager",
                        "kube-scheduler",
                        "kube-proxy",
                        "pause",
                        "coredns",
                        "crictl",
                        "cri-o",
                    ],
                ),
                ("cni_version", vec!["cni"]),
                ("containerd_version", vec!["containerd"]),
                ("calico_version", vec!["calico"]),
                ("cilium_version", vec!["cilium"]),
                ("etcd_version", vec!["etcd"]),
                (POD_INFRA_VERSION_KEY, vec!["pause"]),
                ("runc_version", vec!["runc"]),
            ],
            [
                "crun",
                "runsc",
                "cri-dockerd",
                "yq",
                "nginx",
                "k8s-dns-node-cache",
                "cluster-proportional-autoscaler",
            ],
        )
    }

    /// Component keys in table order
    pub fn component_keys(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Whether `key` is a legal manifest key
    pub fn is_known_key(&self, key: &str) -> bool {
        key == IMAGE_ARCH_KEY || self.components.contains_key(key)
    }

    /// Keywords for a component, empty when the key is unknown
    pub fn keywords(&self, key: &str) -> &[String] {
        self.components.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names that are always collected in a full build
    pub fn auxiliary(&self) -> &[String] {
        &self.auxiliary
    }

    /// Keywords for every component not in `present`, plus the auxiliary names
    pub fn catch_all<'a>(&self, present: impl IntoIterator<Item = &'a str>) -> IndexSet<String> {
        let present: IndexSet<&str> = present.into_iter().collect();
        let mut keywords: IndexSet<String> = self.auxiliary.iter().cloned().collect();
        for (key, words) in &self.components {
            if !present.contains(key.as_str()) {
                keywords.extend(words.iter().cloned());
            }
        }
        keywords
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::kubespray()
    }
}

/// Component name of a versioned key: `etcd_version` -> `etcd`
pub fn component_name(key: &str) -> &str {
    key.strip_suffix(VERSION_SUFFIX).unwrap_or(key)
}
