//! Schemas command - list the GVKs a set of CRDs registers

use console::style;
use crdassert_core::SchemaRegistry;
use std::path::PathBuf;

use crate::error::{CliError, Result};

pub fn run(crds: &[PathBuf], json_output: bool) -> Result<()> {
    let mut registry = SchemaRegistry::new();
    registry.load_files(crds).map_err(CliError::crd)?;

    if json_output {
        let rendered =
            serde_json::to_string_pretty(&registry.gvks()).map_err(|e| CliError::Other {
                message: e.to_string(),
            })?;
        println!("{}", rendered);
        return Ok(());
    }

    println!(
        "{} {} schema(s) registered from {} CRD file(s)",
        style("→").blue(),
        registry.len(),
        crds.len()
    );

    for gvk in registry.gvks() {
        println!(
            "  {} {} {}",
            style("•").dim(),
            style(gvk.api_version()).cyan(),
            gvk.kind
        );
    }

    Ok(())
}
