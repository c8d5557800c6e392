//! CLI commands

pub mod build;
pub mod plan;

use airgap_core::{JobCompiler, JobPlan, KeywordTable, VersionManifest};
use airgap_repo::DependencyResolver;

use crate::config::Settings;
use crate::error::Result;

/// Load the manifest and reject unknown keys before anything external runs
pub(crate) fn load_manifest(settings: &Settings, table: &KeywordTable) -> Result<VersionManifest> {
    let manifest = VersionManifest::load(&settings.manifest)?;
    manifest.validate(table).into_result()?;
    tracing::debug!(path = %settings.manifest.display(), keys = manifest.len(), "loaded manifest");
    Ok(manifest)
}

/// Resolve pause versions for the manifest's Kubernetes releases and compile
/// the job plan
pub(crate) async fn compile_plan(
    settings: &Settings,
    table: &KeywordTable,
    manifest: &mut VersionManifest,
) -> Result<JobPlan> {
    let resolver = match &settings.descriptor_url {
        Some(template) => DependencyResolver::with_url_template(template.clone())?,
        None => DependencyResolver::for_zone(settings.zone)?,
    };
    let pod_infra_versions = resolver.pod_infra_versions(&manifest.kube_versions()).await?;

    Ok(JobCompiler::new(table).compile_with_pod_infra(manifest, pod_infra_versions)?)
}
