//! Airgap CLI - computes and packages the artifacts of an air-gapped Kubespray bundle

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;
mod error;
mod exit_codes;

use config::Settings;

#[derive(Parser)]
#[command(name = "airgap")]
#[command(version)]
#[command(about = "Computes and packages the artifacts of an air-gapped Kubespray bundle", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve artifacts, package them and write the LocalArtifactSet
    Build {
        /// Resolve and print URL lists without running the packager
        #[arg(long)]
        skip_package: bool,
    },

    /// Show the job plan derived from the manifest
    Plan {
        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Build { skip_package } => commands::build::run(&cli.settings, skip_package).await,
        Commands::Plan { json } => commands::plan::run(&cli.settings, json).await,
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
