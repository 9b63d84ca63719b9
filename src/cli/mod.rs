pub mod aggregate;
pub mod extract;
pub mod init;
pub mod run;

use crate::models::ReportConfig;
use crate::Result;
use clap::Args;
use std::path::PathBuf;

/// Config file location plus per-path overrides shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (default: ./covconflicts.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exported conflict page
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Intermediate JSON file
    #[arg(long)]
    pub intermediate: Option<PathBuf>,

    /// Consolidated workbook
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for per-annotator workbooks
    #[arg(long)]
    pub annotator_dir: Option<PathBuf>,

    /// Disagreement summary workbook
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Where to dump the text of a block that failed to parse
    #[arg(long)]
    pub error_file: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the config file and apply command-line overrides
    pub fn load(&self) -> Result<ReportConfig> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(ReportConfig::FILE_NAME));
        let mut config = ReportConfig::load(&config_path)?;

        let paths = &mut config.paths;
        let overrides = [
            (&self.input, &mut paths.input_html),
            (&self.intermediate, &mut paths.intermediate),
            (&self.output, &mut paths.consolidated),
            (&self.annotator_dir, &mut paths.annotator_dir),
            (&self.summary, &mut paths.summary),
            (&self.error_file, &mut paths.error_diagnostic),
        ];
        for (value, target) in overrides {
            if let Some(path) = value {
                *target = path.clone();
            }
        }

        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_win_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        std::fs::write(&config_path, "[paths]\nsummary = \"from_file.xlsx\"\n").unwrap();

        let args = ConfigArgs {
            config: Some(config_path),
            output: Some(PathBuf::from("cli.xlsx")),
            ..Default::default()
        };
        let config = args.load().unwrap();

        assert_eq!(config.paths.consolidated, PathBuf::from("cli.xlsx"));
        assert_eq!(config.paths.summary, temp_dir.path().join("from_file.xlsx"));
    }
}
