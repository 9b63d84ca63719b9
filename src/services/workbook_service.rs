//! Spreadsheet output

use crate::models::{ReportConfig, REPORT_COLUMNS, SUMMARY_COLUMNS};
use crate::services::aggregate_service::{report_file_name, summary_rows, Aggregation};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Excel rejects longer strings in a single cell
const MAX_CELL_CHARS: usize = 32_767;

/// Files written by [`write_reports`]; `None` means there was nothing to write
#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub consolidated: Option<PathBuf>,
    /// (annotator, workbook) pairs, sorted by annotator
    pub annotator_reports: Vec<(String, PathBuf)>,
    pub summary: Option<PathBuf>,
}

/// Write a single-sheet workbook with a bold header row
pub fn write_table<I>(path: &Path, headers: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<Value>>,
{
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_fmt)?;
    }

    for (idx, cells) in rows.into_iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(sheet, row, col as u16, cell)?;
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path.display()))?;
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Value) -> Result<(), XlsxError> {
    match cell {
        Value::Null => {}
        Value::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                sheet.write_number(row, col, f)?;
            }
            None => {
                sheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            sheet.write_string(row, col, clip(s))?;
        }
        other => {
            sheet.write_string(row, col, clip(&other.to_string()))?;
        }
    }
    Ok(())
}

fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Write the consolidated, per-annotator and summary workbooks
///
/// Empty tables are skipped rather than written as header-only sheets.
pub fn write_reports(aggregation: &Aggregation, config: &ReportConfig) -> Result<ReportOutcome> {
    let paths = &config.paths;
    let mut outcome = ReportOutcome::default();

    if !aggregation.rows.is_empty() {
        write_table(
            &paths.consolidated,
            &REPORT_COLUMNS,
            aggregation.rows.iter().map(|r| r.cells()),
        )?;
        outcome.consolidated = Some(paths.consolidated.clone());
    }

    if !aggregation.annotator_reports.is_empty() {
        std::fs::create_dir_all(&paths.annotator_dir).with_context(|| {
            format!("Failed to create {}", paths.annotator_dir.display())
        })?;
    }
    for (annotator, rows) in &aggregation.annotator_reports {
        let path = paths.annotator_dir.join(report_file_name(annotator));
        write_table(&path, &REPORT_COLUMNS, rows.iter().map(|r| r.cells()))?;
        outcome.annotator_reports.push((annotator.clone(), path));
    }

    if !aggregation.disagreements.is_empty() {
        let rows = summary_rows(&aggregation.disagreements);
        write_table(&paths.summary, &SUMMARY_COLUMNS, rows.iter().map(|r| r.cells()))?;
        outcome.summary = Some(paths.summary.clone());
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_table_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("table.xlsx");

        write_table(
            &path,
            &["Name", "Count", "Flag"],
            vec![
                vec![json!("x"), json!(1), json!(true)],
                vec![Value::Null, json!(2.5), json!({"nested": 1})],
            ],
        )
        .unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_clip_long_text() {
        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(clip("short"), "short");
    }

    #[test]
    fn test_empty_aggregation_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ReportConfig::default();
        config.paths.resolve(temp_dir.path());

        let outcome = write_reports(&Aggregation::default(), &config).unwrap();

        assert!(outcome.consolidated.is_none());
        assert!(outcome.annotator_reports.is_empty());
        assert!(outcome.summary.is_none());
        assert!(!config.paths.consolidated.exists());
        assert!(!config.paths.summary.exists());
    }
}
