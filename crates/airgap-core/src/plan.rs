//! Job compilation
//!
//! A manifest is expanded into one job per version index. Job `i` carries the
//! `i`-th version of every list-valued component (when the list is long
//! enough) and, for `i == 0`, every single-valued component. Each job is later
//! run once per architecture.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::keywords::KeywordTable;
use crate::manifest::{VersionManifest, VersionValue};

/// One version-parameterized list generation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub index: usize,
    /// Substrings selecting this job's artifacts from the candidate lists
    pub keywords: IndexSet<String>,
    /// Ansible `key='value'` assignments, in manifest order
    pub extra_vars: Vec<String>,
}

/// Everything the batch engine needs to run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPlan {
    pub architectures: Vec<String>,
    pub jobs: Vec<Job>,
    /// Keywords for components the manifest leaves out, plus auxiliary names
    pub catch_all_keywords: IndexSet<String>,
}

/// Format a generator extra variable
pub fn extra_var(key: &str, value: &str) -> String {
    format!("{}='{}'", key, value)
}

/// Expands manifests into job plans against a keyword table
#[derive(Debug, Clone, Copy)]
pub struct JobCompiler<'a> {
    table: &'a KeywordTable,
}

impl<'a> JobCompiler<'a> {
    pub fn new(table: &'a KeywordTable) -> Self {
        Self { table }
    }

    /// Record the resolved pause versions on the manifest, then compile it
    pub fn compile_with_pod_infra(
        &self,
        manifest: &mut VersionManifest,
        pod_infra_versions: Vec<String>,
    ) -> Result<JobPlan> {
        manifest.set_pod_infra_versions(pod_infra_versions);
        self.compile(manifest)
    }

    /// Compile a manifest as-is
    pub fn compile(&self, manifest: &VersionManifest) -> Result<JobPlan> {
        if !manifest.has_list() {
            return Err(CoreError::NoVersionLists);
        }

        let job_count = manifest
            .components()
            .filter_map(|(_, value)| match value {
                VersionValue::List(versions) => Some(versions.len()),
                VersionValue::Single(_) => None,
            })
            .max()
            .unwrap_or(0)
            .max(1);

        let jobs = (0..job_count)
            .map(|index| {
                let mut job = Job {
                    index,
                    ..Job::default()
                };
                for (key, value) in manifest.components() {
                    if let Some(version) = value.at(index) {
                        job.keywords.extend(self.table.keywords(key).iter().cloned());
                        job.extra_vars.push(extra_var(key, version));
                    }
                }
                job
            })
            .collect::<Vec<_>>();

        let plan = JobPlan {
            architectures: manifest.architectures(),
            jobs,
            catch_all_keywords: self.table.catch_all(manifest.keys()),
        };

        tracing::debug!(
            architectures = ?plan.architectures,
            jobs = plan.jobs.len(),
            catch_all = plan.catch_all_keywords.len(),
            "compiled job plan"
        );

        Ok(plan)
    }
}
