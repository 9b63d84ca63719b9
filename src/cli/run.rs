use crate::models::ReportConfig;
use crate::Result;
use colored::Colorize;

/// Extract (unless skipped) and then aggregate
pub fn run(config: &ReportConfig, skip_extract: bool) -> Result<()> {
    if skip_extract {
        println!(
            "{}",
            format!(
                "⏭ Skipping extraction, reusing {}",
                config.paths.intermediate.display()
            )
            .cyan()
        );
    } else {
        super::extract::run(config)?;
    }

    println!();
    println!("{}", "📊 Building reports...".cyan());
    super::aggregate::run(config)?;

    println!("\n{}", "✅ Done".green().bold());
    Ok(())
}
