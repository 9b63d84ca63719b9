use crate::models::ReportConfig;
use crate::services::aggregate_service;
use crate::services::workbook_service::{self, ReportOutcome};
use crate::Result;
use colored::Colorize;

pub fn run(config: &ReportConfig) -> Result<()> {
    let exports = aggregate_service::load_exports(&config.paths.intermediate)?;
    let aggregation = aggregate_service::aggregate(&exports, config.aggregation.pairing);
    tracing::debug!(
        exports = exports.len(),
        studies = aggregation.rows.len(),
        annotators = aggregation.annotator_reports.len(),
        "aggregated"
    );

    let outcome = workbook_service::write_reports(&aggregation, config)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ReportOutcome) {
    match &outcome.consolidated {
        Some(path) => println!(
            "{}",
            format!("✓ Data extracted and saved to {}", path.display()).green()
        ),
        None => println!("{}", "⚠ No data extracted from the JSON file.".yellow()),
    }

    for (annotator, path) in &outcome.annotator_reports {
        println!(
            "   ✓ Annotator report saved for {}: {}",
            annotator,
            path.display()
        );
    }

    match &outcome.summary {
        Some(path) => println!(
            "{}",
            format!("✓ Conflict summary report saved to {}", path.display()).green()
        ),
        None => println!("{}", "⚠ No disagreements found; summary not written.".yellow()),
    }
}
