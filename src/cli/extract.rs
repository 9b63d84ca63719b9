use crate::models::ReportConfig;
use crate::services::extract_service::{self, ExtractionOutcome};
use crate::Result;
use colored::Colorize;

pub fn run(config: &ReportConfig) -> Result<()> {
    println!(
        "{}",
        format!("🔎 Scanning {}", config.paths.input_html.display()).cyan()
    );

    let outcome = extract_service::run_extraction(config)?;
    print_outcome(&outcome, config);
    Ok(())
}

fn print_outcome(outcome: &ExtractionOutcome, config: &ReportConfig) {
    for failure in &outcome.failures {
        eprintln!(
            "{}",
            format!(
                "⚠ Skipping script #{} ({}): {}",
                failure.script_index,
                failure.error.kind(),
                failure.error
            )
            .yellow()
        );
    }
    if !outcome.failures.is_empty() {
        eprintln!(
            "   Last failing content saved to {}",
            config.paths.error_diagnostic.display()
        );
    }

    if outcome.matched == 0 {
        println!(
            "{}",
            format!("⚠ No script contains '{}'", config.extraction.marker).yellow()
        );
    }

    println!(
        "{}",
        format!(
            "✓ Intermediate JSON saved to {} ({} of {} blocks)",
            config.paths.intermediate.display(),
            outcome.exports.len(),
            outcome.matched
        )
        .green()
    );
}
