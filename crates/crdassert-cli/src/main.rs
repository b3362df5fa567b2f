//! crdassert CLI - check Kubernetes custom resources against their CRD schemas

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod display;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "crdassert")]
#[command(author = "crdassert Contributors")]
#[command(version)]
#[command(about = "Check Kubernetes custom resources against the schemas of their CRDs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate resource files against the schemas of the given CRDs
    Check {
        /// CRD file(s) to load (YAML or JSON, multi-document allowed)
        #[arg(short = 'c', long = "crd", required = true)]
        crds: Vec<PathBuf>,

        /// Resource file(s) to check
        #[arg(required = true)]
        resources: Vec<PathBuf>,

        /// Output validation results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the group/version/kinds registered by the given CRDs
    Schemas {
        /// CRD file(s) to load
        #[arg(short = 'c', long = "crd", required = true)]
        crds: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };

        tracing_subscriber::registry()
            .with(EnvFilter::new("crdassert_core=debug"))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let result = match cli.command {
        Commands::Check {
            crds,
            resources,
            json,
        } => commands::check::run(&crds, &resources, json),

        Commands::Schemas { crds, json } => commands::schemas::run(&crds, json),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
