//! Display formatting for CLI output
//!
//! Groups schema violations by the resource they were found in.

use console::style;
use crdassert_core::Violation;
use std::collections::BTreeMap;

/// A schema violation with location information
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Source document and resource, e.g. `es.yaml (ExternalSecret/db)`
    pub resource: String,
    pub path: String,
    pub message: String,
}

/// Grouped validation results for display
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub checked_count: usize,
    pub failed_count: usize,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of checking one resource
    pub fn add_result(&mut self, resource: &str, violations: &[Violation]) {
        self.checked_count += 1;
        if violations.is_empty() {
            return;
        }

        self.failed_count += 1;
        for violation in violations {
            self.issues.push(ValidationIssue {
                resource: resource.to_string(),
                path: violation.path.clone(),
                message: violation.message.clone(),
            });
        }
    }

    /// Display violations grouped by resource
    pub fn display(&self) {
        let mut by_resource: BTreeMap<&str, Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in &self.issues {
            by_resource.entry(&issue.resource).or_default().push(issue);
        }

        for (resource, issues) in by_resource {
            println!();
            println!("{}", style(resource).cyan().bold());

            for issue in issues {
                println!(
                    "  {} {} at {}",
                    style("✗").red(),
                    issue.message,
                    style(&issue.path).dim()
                );
            }
        }
    }

    /// Print summary line
    pub fn print_summary(&self) {
        if self.has_errors() {
            println!(
                "{} Validation failed: {} violation(s) in {} of {} resource(s)",
                style("✗").red().bold(),
                self.issues.len(),
                self.failed_count,
                self.checked_count
            );
        } else {
            println!(
                "{} Validation passed! {} resource(s) checked",
                style("✓").green().bold(),
                self.checked_count
            );
        }
    }

    /// Check if any resource violated its schema
    pub fn has_errors(&self) -> bool {
        self.failed_count > 0
    }
}
