//! Check command - validate resources against CRD schemas

use console::style;
use crdassert_core::{Resource, ResourceAsserter, Violation, document};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::display::ValidationReport;
use crate::error::{CliError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceOutcome {
    source: String,
    api_version: String,
    kind: String,
    name: String,
    valid: bool,
    errors: Vec<Violation>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    valid: bool,
    schemas: usize,
    resources: &'a [ResourceOutcome],
}

pub fn run(crds: &[PathBuf], resources: &[PathBuf], json_output: bool) -> Result<()> {
    let mut asserter = ResourceAsserter::new();
    asserter.load_files(crds).map_err(CliError::crd)?;

    if !json_output {
        println!(
            "{} Loaded {} schema(s) from {} CRD file(s)",
            style("→").blue(),
            asserter.registry().len(),
            crds.len()
        );
    }

    let mut report = ValidationReport::new();
    let mut outcomes = Vec::new();

    for path in resources {
        for outcome in check_file(&asserter, path)? {
            let label = format!("{} ({}/{})", outcome.source, outcome.kind, outcome.name);

            if !json_output {
                if outcome.valid {
                    println!("  {} {}", style("✓").green(), label);
                } else {
                    println!(
                        "  {} {} ({} violation(s))",
                        style("✗").red(),
                        label,
                        outcome.errors.len()
                    );
                }
            }

            report.add_result(&label, &outcome.errors);
            outcomes.push(outcome);
        }
    }

    if json_output {
        let output = CheckOutput {
            valid: !report.has_errors(),
            schemas: asserter.registry().len(),
            resources: &outcomes,
        };
        let rendered = serde_json::to_string_pretty(&output).map_err(|e| CliError::Other {
            message: e.to_string(),
        })?;
        println!("{}", rendered);
    } else {
        report.display();
        println!();
        report.print_summary();
    }

    if report.has_errors() {
        return Err(CliError::ValidationFailed {
            failed: report.failed_count,
            total: report.checked_count,
        });
    }

    Ok(())
}

/// Check every document of one resource file
fn check_file(asserter: &ResourceAsserter, path: &Path) -> Result<Vec<ResourceOutcome>> {
    let source = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| CliError::Io {
        message: format!("error reading {}: {}", source, e),
    })?;

    let documents =
        document::decode_sourced(&source, &bytes).map_err(|e| CliError::from(e.in_source(&source)))?;

    let mut outcomes = Vec::with_capacity(documents.len());

    for doc in documents {
        let resource = Resource::from_value(doc.value)
            .map_err(|e| CliError::from(e.in_source(&doc.source_name)))?;
        let result = asserter
            .validate(&resource)
            .map_err(|e| CliError::from(e.in_source(&doc.source_name)))?;

        outcomes.push(ResourceOutcome {
            source: doc.source_name,
            api_version: resource.gvk().api_version(),
            kind: resource.gvk().kind.clone(),
            name: resource.name().to_string(),
            valid: result.is_valid(),
            errors: result.errors,
        });
    }

    Ok(outcomes)
}
