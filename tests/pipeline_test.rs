//! Integration tests for the extract → aggregate pipeline
//!
//! Covers:
//! - Recovering payloads from an exported page with mixed script blocks
//! - Diagnostics for blocks that fail to parse
//! - Workbook output for studies, annotators and disagreements

use covidence_conflicts::models::{PairingMode, ReportConfig, SummaryRow};
use covidence_conflicts::services::{aggregate_service, extract_service, workbook_service};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn initialize_script(literal: &str) -> String {
    format!(
        r##"$(function() {{
  if (Covidence.ready) {{
    var options = {{el: "#conflicts", mode: "resolve"}};
    Covidence.StudiesController.initialize({});
  }}
}});"##,
        literal
    )
}

/// Write an export page with two payload scripts, one broken payload and
/// unrelated scripts
fn write_export(path: &Path) {
    let first = initialize_script(
        r#"{studies: [{id: 101, unique_index: "Smith 2020", title: "Effects: of "X" on Y", authors: "Smith J; Doe A", abstract: "Objective: test \"things\".", journal_info: "J Test. 2020;1(2)", publisher_info: null, references: [{doi: "10.1000/xyz"},], votes: [{reviewer_name: "Alice Smith", vote: "Yes"}, {reviewer_name: "Bob", vote: "No"},],},],}"#,
    );
    let second = initialize_script(
        r#"{studies: [{id: 102, unique_index: "Lee 2021", title: "Second study", authors: "Lee K", abstract: "Short", journal_info: "", publisher_info: "ACME", references: [], votes: [{reviewer_name: "Bob", vote: "Maybe"}, {reviewer_name: "Alice Smith", vote: "Maybe"}],}]}"#,
    );
    let broken = initialize_script(r#"{studies: [{id: 103, votes: [oops]}]}"#);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<script src="/assets/application.js"></script>
<script>window.dataLayer = [{{page: "conflicts"}}];</script>
</head>
<body>
<div id="conflicts"></div>
<script>{}</script>
<script>{}</script>
<script>{}</script>
</body>
</html>"#,
        first, broken, second
    );
    fs::write(path, html).unwrap();
}

fn config_in(dir: &Path) -> ReportConfig {
    let mut config = ReportConfig::default();
    config.paths.resolve(dir);
    config
}

#[test]
fn test_extraction_recovers_payloads_and_diagnoses_failures() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path());
    write_export(&config.paths.input_html);

    let outcome = extract_service::run_extraction(&config).unwrap();

    assert_eq!(outcome.matched, 3);
    assert_eq!(outcome.exports.len(), 2);
    assert_eq!(outcome.failures.len(), 1);

    let diagnostic = fs::read_to_string(&config.paths.error_diagnostic).unwrap();
    assert!(diagnostic.contains(r#""votes": [oops]"#));

    let exports = aggregate_service::load_exports(&config.paths.intermediate).unwrap();
    assert_eq!(exports.len(), 2);
    let first = &exports[0].studies[0];
    assert_eq!(first.title, "Effects of 'X' on Y");
    assert_eq!(first.abstract_text, "Objective test 'things'.");
    assert_eq!(first.doi(), "10.1000/xyz");
}

#[test]
fn test_full_pipeline_writes_all_workbooks() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path());
    write_export(&config.paths.input_html);

    extract_service::run_extraction(&config).unwrap();
    let exports = aggregate_service::load_exports(&config.paths.intermediate).unwrap();
    let aggregation = aggregate_service::aggregate(&exports, PairingMode::Complementary);

    assert_eq!(aggregation.rows.len(), 2);
    assert_eq!(aggregation.rows[0].study_id, 101);
    assert_eq!(aggregation.rows[1].study_id, 102);
    assert!(aggregation.rows[1].doi.is_null());
    assert_eq!(aggregation.disagreements.get("Alice Smith", "Bob"), 1);
    assert_eq!(aggregation.disagreements.get("Bob", "Alice Smith"), 1);

    let outcome = workbook_service::write_reports(&aggregation, &config).unwrap();

    assert!(config.paths.consolidated.exists());
    assert!(config.paths.summary.exists());
    assert_eq!(outcome.annotator_reports.len(), 2);
    assert!(config
        .paths
        .annotator_dir
        .join("Alice_Smith_report.xlsx")
        .exists());
    assert!(config.paths.annotator_dir.join("Bob_report.xlsx").exists());
}

#[test]
fn test_aggregation_only_rerun_from_existing_intermediate() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path());
    fs::write(
        &config.paths.intermediate,
        r#"[
    {"studies": [
        {"id": 1, "votes": [{"reviewer_name": "A", "vote": "Yes"}, {"reviewer_name": "B", "vote": "No"}]},
        {"id": 2, "votes": [{"reviewer_name": "B", "vote": "Yes"}, {"reviewer_name": "C", "vote": "No"}]},
        {"id": 3, "votes": [{"reviewer_name": "C", "vote": "Yes"}, {"reviewer_name": "A", "vote": "No"}]},
        {"id": 4, "votes": [{"reviewer_name": "A", "vote": "Yes"}, {"reviewer_name": "C", "vote": "No"}]}
    ]}
]"#,
    )
    .unwrap();

    let exports = aggregate_service::load_exports(&config.paths.intermediate).unwrap();
    let aggregation = aggregate_service::aggregate(&exports, PairingMode::Complementary);
    let rows = aggregate_service::summary_rows(&aggregation.disagreements);

    let grand_totals: Vec<(&str, u32)> = rows
        .iter()
        .filter_map(|r| match r {
            SummaryRow::GrandTotal {
                annotator,
                disagreements,
            } => Some((annotator.as_str(), *disagreements)),
            _ => None,
        })
        .collect();
    assert_eq!(grand_totals, vec![("A", 3), ("B", 2), ("C", 3)]);

    for (annotator, total) in grand_totals {
        let pair_sum: u32 = rows
            .iter()
            .filter_map(|r| match r {
                SummaryRow::Pair {
                    annotator: a,
                    disagreements,
                    ..
                } if a == annotator => Some(*disagreements),
                _ => None,
            })
            .sum();
        assert_eq!(pair_sum, total);
    }

    workbook_service::write_reports(&aggregation, &config).unwrap();
    assert!(config.paths.summary.exists());
}

#[test]
fn test_page_without_payload_yields_no_reports() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path());
    fs::write(
        &config.paths.input_html,
        "<html><body><script>var nothing = {};</script></body></html>",
    )
    .unwrap();

    let outcome = extract_service::run_extraction(&config).unwrap();
    assert_eq!(outcome.matched, 0);

    let exports = aggregate_service::load_exports(&config.paths.intermediate).unwrap();
    assert!(exports.is_empty());

    let aggregation = aggregate_service::aggregate(&exports, PairingMode::Complementary);
    let written = workbook_service::write_reports(&aggregation, &config).unwrap();

    assert!(written.consolidated.is_none());
    assert!(written.summary.is_none());
    assert!(!config.paths.consolidated.exists());
    assert!(!config.paths.error_diagnostic.exists());
}

#[test]
fn test_missing_intermediate_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path());

    let err = aggregate_service::load_exports(&config.paths.intermediate).unwrap_err();
    assert!(err.to_string().contains("intermediate_data.json"));
}
