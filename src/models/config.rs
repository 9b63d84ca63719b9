use crate::parser::DEFAULT_BRACE_ORDINAL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Marker text identifying the script that carries the study payload
pub const DEFAULT_MARKER: &str = "Covidence.StudiesController.initialize";

// =============================================================================
// Paths
// =============================================================================

/// Input, intermediate and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Exported conflict page
    pub input_html: PathBuf,

    /// Repaired payloads, one JSON value per script block
    pub intermediate: PathBuf,

    /// Workbook with every study
    pub consolidated: PathBuf,

    /// Directory receiving one workbook per annotator
    pub annotator_dir: PathBuf,

    /// Disagreement summary workbook
    pub summary: PathBuf,

    /// Text of the most recent block that failed to parse
    pub error_diagnostic: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_html: PathBuf::from("conflict_info.html"),
            intermediate: PathBuf::from("intermediate_data.json"),
            consolidated: PathBuf::from("conflicts.xlsx"),
            annotator_dir: PathBuf::from("annotator_reports"),
            summary: PathBuf::from("conflict_report_summary.xlsx"),
            error_diagnostic: PathBuf::from("error_json_content.txt"),
        }
    }
}

impl PathsConfig {
    /// Resolve relative paths against `base`
    pub fn resolve(&mut self, base: &Path) {
        for path in [
            &mut self.input_html,
            &mut self.intermediate,
            &mut self.consolidated,
            &mut self.annotator_dir,
            &mut self.summary,
            &mut self.error_diagnostic,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

// =============================================================================
// Extraction / Aggregation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Substring a script must contain to be considered
    pub marker: String,

    /// Which `{` (0-based) in the script opens the payload
    pub brace_ordinal: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            brace_ordinal: DEFAULT_BRACE_ORDINAL,
        }
    }
}

/// How voters are paired when a study has more than two votes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingMode {
    /// Voters 0 and 1 pair with each other; any later voter pairs with the
    /// one after it, wrapping to the first. Disagreements use voters 0 and 1.
    #[default]
    Complementary,
    /// Every voter pairs with every other voter
    AllPairs,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub pairing: PairingMode,
}

// =============================================================================
// Report Configuration
// =============================================================================

/// Settings for a full extraction and reporting run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub paths: PathsConfig,
    pub extraction: ExtractionConfig,
    pub aggregation: AggregationConfig,
}

impl ReportConfig {
    /// Default config file name, looked up in the working directory
    pub const FILE_NAME: &'static str = "covconflicts.toml";

    /// Load config from `config_path`, falling back to defaults when absent
    ///
    /// Relative paths are resolved against the directory holding the file.
    pub fn load(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str::<ReportConfig>(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        config.paths.resolve(base);
        Ok(config)
    }

    /// Write config as TOML to `config_path`
    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(())
    }
}
