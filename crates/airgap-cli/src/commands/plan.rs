//! Plan command - show the jobs a build would run

use airgap_core::KeywordTable;
use serde::Serialize;

use super::{compile_plan, load_manifest};
use crate::config::Settings;
use crate::display;
use crate::error::{CliError, Result};

#[derive(Serialize)]
struct PlanOutput<'a> {
    mode: String,
    manifest: &'a airgap_core::VersionManifest,
    plan: &'a airgap_core::JobPlan,
}

pub async fn run(settings: &Settings, json: bool) -> Result<()> {
    let table = KeywordTable::kubespray();
    let mut manifest = load_manifest(settings, &table)?;
    let plan = compile_plan(settings, &table, &mut manifest).await?;

    if json {
        let output = PlanOutput {
            mode: settings.mode.to_string(),
            manifest: &manifest,
            plan: &plan,
        };
        let rendered = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", rendered);
    } else {
        display::print_options(settings.mode, settings.zone, settings.option);
        display::print_plan(&plan, settings.mode);
    }

    Ok(())
}
