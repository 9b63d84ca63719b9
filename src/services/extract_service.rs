//! Extraction: exported HTML page → intermediate JSON file

use crate::models::{ExtractionConfig, ReportConfig};
use crate::parser::{find_script_blocks, parse_literal, LiteralError};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A marked script block that could not be recovered
#[derive(Debug)]
pub struct BlockFailure {
    /// Position of the script among all `<script>` elements
    pub script_index: usize,
    pub error: LiteralError,
}

/// Result of scanning one document
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    /// Repaired payloads in document order
    pub exports: Vec<Value>,
    /// Number of scripts carrying the marker
    pub matched: usize,
    pub failures: Vec<BlockFailure>,
}

/// Recover every marked payload in `html`
///
/// Failing blocks are skipped. For each failure the diagnostic file is
/// overwritten with the text being repaired (or the raw script when the
/// literal could not even be located).
pub fn extract_exports(
    html: &str,
    extraction: &ExtractionConfig,
    diagnostic_path: &Path,
) -> Result<ExtractionOutcome> {
    let blocks = find_script_blocks(html, &extraction.marker)?;
    let mut outcome = ExtractionOutcome {
        matched: blocks.len(),
        ..Default::default()
    };

    for block in blocks {
        match parse_literal(&block.text, extraction.brace_ordinal) {
            Ok(value) => {
                tracing::debug!(script = block.index, "recovered payload");
                outcome.exports.push(value);
            }
            Err(error) => {
                let text = error.diagnostic_text().unwrap_or(&block.text);
                if let Err(e) = fs::write(diagnostic_path, text) {
                    tracing::warn!(
                        path = %diagnostic_path.display(),
                        "failed to write diagnostic file: {}",
                        e
                    );
                }
                tracing::debug!(script = block.index, kind = error.kind(), "skipping script");
                outcome.failures.push(BlockFailure {
                    script_index: block.index,
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

/// Read the configured HTML page, extract it and persist the intermediate file
pub fn run_extraction(config: &ReportConfig) -> Result<ExtractionOutcome> {
    let paths = &config.paths;
    let html = fs::read_to_string(&paths.input_html)
        .with_context(|| format!("Failed to read {}", paths.input_html.display()))?;

    let outcome = extract_exports(&html, &config.extraction, &paths.error_diagnostic)?;
    write_intermediate(&paths.intermediate, &outcome.exports)?;
    Ok(outcome)
}

/// Save payloads as a 4-space indented JSON array
///
/// Writes to a temporary file in the target directory and persists it over
/// the destination so a failed run never leaves a truncated file behind.
pub fn write_intermediate(path: &Path, exports: &[Value]) -> Result<()> {
    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    exports.serialize(&mut serializer)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(&content)?;
    temp_file.flush()?;
    temp_file
        .persist(path)
        .map_err(|e| anyhow::anyhow!("Failed to persist {}: {}", path.display(), e))?;

    Ok(())
}
