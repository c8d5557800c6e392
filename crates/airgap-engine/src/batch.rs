//! Batch resolution
//!
//! For every architecture, each job of the plan is run through the list
//! generator and the candidate lines are narrowed to the job's keywords. In a
//! full build the first job's lists are also narrowed by the plan's catch-all
//! keywords, once per architecture. Everything selected is unioned into the
//! architecture's URL sets.

use std::collections::BTreeSet;

use airgap_core::{JobPlan, Mode, PackageOption, filter_by_keywords};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::generator::{CandidateLists, ListGenerator};
use crate::packager::Packager;

/// Final URL sets of one architecture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedArtifactSet {
    pub file_urls: BTreeSet<String>,
    pub image_urls: BTreeSet<String>,
}

impl ResolvedArtifactSet {
    /// Select from `lists` with `keywords`
    pub fn select<I, S>(lists: &CandidateLists, keywords: I) -> Self
    where
        I: IntoIterator<Item = S> + Clone,
        S: AsRef<str>,
    {
        Self {
            file_urls: filter_by_keywords(&lists.files, keywords.clone())
                .into_iter()
                .collect(),
            image_urls: filter_by_keywords(&lists.images, keywords)
                .into_iter()
                .collect(),
        }
    }

    pub fn merge(&mut self, other: ResolvedArtifactSet) {
        self.file_urls.extend(other.file_urls);
        self.image_urls.extend(other.image_urls);
    }

    pub fn files(&self) -> Vec<String> {
        self.file_urls.iter().cloned().collect()
    }

    pub fn images(&self) -> Vec<String> {
        self.image_urls.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.file_urls.is_empty() && self.image_urls.is_empty()
    }
}

/// Runs a job plan against a list generator, one job at a time
pub struct BatchResolver<G> {
    generator: G,
    mode: Mode,
}

impl<G: ListGenerator> BatchResolver<G> {
    pub fn new(generator: G, mode: Mode) -> Self {
        Self { generator, mode }
    }

    /// Resolve one architecture
    pub async fn resolve_architecture(
        &mut self,
        plan: &JobPlan,
        arch: &str,
    ) -> Result<ResolvedArtifactSet> {
        let mut resolved = ResolvedArtifactSet::default();
        let mut catch_all: Option<ResolvedArtifactSet> = None;

        for job in &plan.jobs {
            let lists = self.generator.generate(arch, &job.extra_vars).await?;
            let selected = ResolvedArtifactSet::select(&lists, &job.keywords);
            tracing::info!(
                arch = %arch,
                job = job.index,
                candidates = lists.files.len() + lists.images.len(),
                files = selected.file_urls.len(),
                images = selected.image_urls.len(),
                "filtered job candidates"
            );

            if self.mode.is_full() && catch_all.is_none() {
                let extra = ResolvedArtifactSet::select(&lists, &plan.catch_all_keywords);
                tracing::info!(
                    arch = %arch,
                    files = extra.file_urls.len(),
                    images = extra.image_urls.len(),
                    "filtered catch-all candidates"
                );
                catch_all = Some(extra);
            }

            resolved.merge(selected);
        }

        if let Some(extra) = catch_all {
            resolved.merge(extra);
        }
        if resolved.is_empty() {
            tracing::warn!(arch = %arch, "no candidate matched any keyword");
        }

        Ok(resolved)
    }

    /// Resolve every architecture of the plan, in plan order
    pub async fn resolve(&mut self, plan: &JobPlan) -> Result<IndexMap<String, ResolvedArtifactSet>> {
        self.each_architecture(plan, None, |_, _| {}).await
    }

    /// Resolve each architecture and hand its lists to `packager` before
    /// moving on to the next. `report` sees every architecture's lists
    /// before they are packaged.
    pub async fn run<F>(
        &mut self,
        plan: &JobPlan,
        packager: &mut dyn Packager,
        option: PackageOption,
        report: F,
    ) -> Result<IndexMap<String, ResolvedArtifactSet>>
    where
        F: FnMut(&str, &ResolvedArtifactSet) + Send,
    {
        self.each_architecture(plan, Some((packager, option)), report)
            .await
    }

    async fn each_architecture<F>(
        &mut self,
        plan: &JobPlan,
        mut packaging: Option<(&mut dyn Packager, PackageOption)>,
        mut report: F,
    ) -> Result<IndexMap<String, ResolvedArtifactSet>>
    where
        F: FnMut(&str, &ResolvedArtifactSet) + Send,
    {
        let mut results = IndexMap::new();
        for arch in &plan.architectures {
            let resolved = self.resolve_architecture(plan, arch).await?;
            for url in resolved.file_urls.iter().chain(&resolved.image_urls) {
                tracing::debug!(arch = %arch, url = %url, "selected");
            }
            report(arch, &resolved);
            if let Some((packager, option)) = packaging.as_mut() {
                packager
                    .package(arch, *option, &resolved.files(), &resolved.images())
                    .await?;
            }
            results.insert(arch.clone(), resolved);
        }
        Ok(results)
    }
}
