//! Build command - resolve, package and record an air-gap bundle

use airgap_core::{CrEmitter, KeywordTable, LocalArtifactSet, unix_timestamp};
use airgap_engine::{BatchResolver, EngineError, ScriptListGenerator, ScriptPackager};
use console::style;

use super::{compile_plan, load_manifest};
use crate::config::{Settings, check_environment};
use crate::display;
use crate::error::Result;

pub async fn run(settings: &Settings, skip_package: bool) -> Result<()> {
    display::print_options(settings.mode, settings.zone, settings.option);

    let table = KeywordTable::kubespray();
    let mut manifest = load_manifest(settings, &table)?;
    check_environment(settings, !skip_package)?;
    let template = LocalArtifactSet::load_template(&settings.cr_template)?;

    let plan = compile_plan(settings, &table, &mut manifest).await?;
    tracing::info!(
        architectures = plan.architectures.len(),
        jobs = plan.jobs.len(),
        mode = %settings.mode,
        "starting batch resolution"
    );

    let generator = ScriptListGenerator::new(&settings.spray_repo);
    let mut resolver = BatchResolver::new(generator, settings.mode);
    let outcome = if skip_package {
        resolver.resolve(&plan).await.map(|results| {
            for (arch, resolved) in &results {
                display::print_urls(arch, resolved);
            }
        })
    } else {
        let mut packager = ScriptPackager::new(
            &settings.pkgs_script,
            &settings.spray_repo,
            settings.tag.clone(),
            settings.zone,
        );
        resolver
            .run(&plan, &mut packager, settings.option, display::print_urls)
            .await
            .map(|_| ())
    };
    if let Some((stdout, stderr)) = outcome.as_ref().err().and_then(EngineError::captured_output) {
        display::print_captured_output(stdout, stderr);
    }
    outcome?;

    let cr = CrEmitter::new(&table, settings.mode).emit(
        template,
        &manifest,
        &settings.release(),
        unix_timestamp(),
    );
    let path = cr.write_to_dir(&settings.output_dir())?;

    println!();
    println!(
        "{} {} ({})",
        style("Wrote").green().bold(),
        path.display(),
        cr.metadata.name
    );

    Ok(())
}
