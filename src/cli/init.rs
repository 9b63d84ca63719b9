use crate::models::ReportConfig;
use crate::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::Path;

/// Write a default config file, asking before replacing an existing one
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;

        if !overwrite {
            println!("{}", "Cancelled by user.".yellow());
            return Ok(());
        }
    }

    ReportConfig::default().save(config_path)?;
    println!("{}", format!("✓ Wrote {}", config_path.display()).green());
    println!("   Edit [paths] to point at your export, then run `covconflicts run`");
    Ok(())
}
