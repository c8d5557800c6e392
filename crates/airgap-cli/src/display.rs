//! Display formatting for CLI output

use airgap_core::{JobPlan, Mode, PackageOption, Zone};
use airgap_engine::ResolvedArtifactSet;
use console::style;

/// Run banner
pub fn print_options(mode: Mode, zone: Zone, option: PackageOption) {
    println!("{} {}", style("→").blue(), options_line(mode, zone, option));
}

fn options_line(mode: Mode, zone: Zone, option: PackageOption) -> String {
    format!("OPTION: {}, ZONE: {}, MODE: {}", option, zone, mode)
}

/// Human-readable job plan
pub fn print_plan(plan: &JobPlan, mode: Mode) {
    println!();
    println!(
        "{} {}",
        style("Architectures:").bold(),
        plan.architectures.join(", ")
    );

    for job in &plan.jobs {
        println!();
        println!("{}", style(format!("Job {}", job.index)).cyan().bold());
        for var in &job.extra_vars {
            println!("  {} {}", style("-e").dim(), var);
        }
        let keywords: Vec<&str> = job.keywords.iter().map(String::as_str).collect();
        println!("  {} {}", style("keywords:").dim(), keywords.join(", "));
    }

    println!();
    let catch_all: Vec<&str> = plan.catch_all_keywords.iter().map(String::as_str).collect();
    if mode.is_full() {
        println!("{} {}", style("Catch-all:").bold(), catch_all.join(", "));
    } else {
        println!(
            "{} {} {}",
            style("Catch-all:").bold(),
            style("(FULL mode only)").dim(),
            catch_all.join(", ")
        );
    }
}

/// Final URL lists of one architecture
pub fn print_urls(arch: &str, resolved: &ResolvedArtifactSet) {
    println!();
    println!("{}", style(format!("[{}]", arch)).cyan().bold());
    println!("---------------- file urls -----------------");
    for url in &resolved.file_urls {
        println!("* {}", url);
    }
    println!("---------------- image urls -----------------");
    for url in &resolved.image_urls {
        println!("* {}", url);
    }
    println!(
        "{} {} file(s), {} image(s)",
        style("✓").green(),
        resolved.file_urls.len(),
        resolved.image_urls.len()
    );
}

/// Output of a failed subprocess, shown before exiting
pub fn print_captured_output(stdout: &str, stderr: &str) {
    if !stdout.trim().is_empty() {
        eprintln!("{}", style("stdout:").dim());
        eprintln!("{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        eprintln!("{}", style("stderr:").dim());
        eprintln!("{}", stderr.trim_end());
    }
}
