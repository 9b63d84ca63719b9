//! Aggregation: parsed exports → report tables

use crate::models::study::is_missing;
use crate::models::{
    DisagreementMatrix, PairingMode, ParsedExport, Study, StudyRow, SummaryRow, MISSING,
};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// All tables derived from a set of exports
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One row per study, in order of appearance
    pub rows: Vec<StudyRow>,
    /// Rows owned by each annotator, keyed by annotator name
    pub annotator_reports: BTreeMap<String, Vec<StudyRow>>,
    pub disagreements: DisagreementMatrix,
}

/// Read the intermediate file written by extraction
pub fn load_exports(path: &Path) -> Result<Vec<ParsedExport>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Flatten studies, pair up annotators and count disagreements
pub fn aggregate(exports: &[ParsedExport], pairing: PairingMode) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for study in exports.iter().flat_map(|e| e.studies.iter()) {
        let voters: Vec<(String, String)> = study
            .votes()
            .iter()
            .map(|v| (v.reviewer(), v.decision()))
            .collect();

        let base = StudyRow::from_study(study);
        aggregation.rows.push(base.with_annotators(
            voter_at(&voters, 0),
            voter_at(&voters, 1),
        ));

        record_disagreements(&mut aggregation.disagreements, &voters, pairing);
        add_annotator_rows(&mut aggregation.annotator_reports, &base, &voters, pairing);
    }

    aggregation
}

/// Aggregate a single study; handy when inspecting one record
pub fn aggregate_study(study: &Study, pairing: PairingMode) -> Aggregation {
    let export = ParsedExport {
        studies: vec![study.clone()],
    };
    aggregate(std::slice::from_ref(&export), pairing)
}

fn voter_at(voters: &[(String, String)], idx: usize) -> (&str, &str) {
    voters
        .get(idx)
        .map(|(name, vote)| (name.as_str(), vote.as_str()))
        .unwrap_or((MISSING, MISSING))
}

/// Indices of the voters paired with voter `idx`
fn counterparts(idx: usize, voter_count: usize, pairing: PairingMode) -> Vec<usize> {
    if voter_count < 2 {
        return Vec::new();
    }
    match pairing {
        PairingMode::Complementary if idx < 2 => vec![1 - idx],
        PairingMode::Complementary => vec![(idx + 1) % voter_count],
        PairingMode::AllPairs => (0..voter_count).filter(|&j| j != idx).collect(),
    }
}

fn record_disagreements(
    matrix: &mut DisagreementMatrix,
    voters: &[(String, String)],
    pairing: PairingMode,
) {
    let pairs: Vec<(usize, usize)> = match pairing {
        PairingMode::Complementary if voters.len() >= 2 => vec![(0, 1)],
        PairingMode::Complementary => Vec::new(),
        PairingMode::AllPairs => (0..voters.len())
            .flat_map(|i| (i + 1..voters.len()).map(move |j| (i, j)))
            .collect(),
    };

    // At most one increment per unordered pair of names per study
    let mut counted: BTreeSet<(&str, &str)> = BTreeSet::new();
    for (i, j) in pairs {
        let (a, vote_a) = (&voters[i].0, &voters[i].1);
        let (b, vote_b) = (&voters[j].0, &voters[j].1);

        if a == b || is_missing(vote_a) || is_missing(vote_b) || vote_a == vote_b {
            continue;
        }
        let key = if a < b {
            (a.as_str(), b.as_str())
        } else {
            (b.as_str(), a.as_str())
        };
        if counted.insert(key) {
            matrix.record(a, b);
        }
    }
}

fn add_annotator_rows(
    reports: &mut BTreeMap<String, Vec<StudyRow>>,
    base: &StudyRow,
    voters: &[(String, String)],
    pairing: PairingMode,
) {
    for (idx, (name, vote)) in voters.iter().enumerate() {
        let owner = (name.as_str(), vote.as_str());
        let rows = reports.entry(name.clone()).or_default();

        let others = counterparts(idx, voters.len(), pairing);
        if others.is_empty() {
            rows.push(base.with_annotators(owner, (MISSING, MISSING)));
        }
        for other in others {
            rows.push(base.with_annotators(owner, voter_at(voters, other)));
        }
    }
}

/// Lay out the disagreement summary sheet
///
/// Annotators are listed by name, each followed by its counterparts (most
/// disagreements first) and a `Total` row. A blank row and a grand-total
/// block close the sheet.
pub fn summary_rows(matrix: &DisagreementMatrix) -> Vec<SummaryRow> {
    let mut rows = Vec::new();

    for annotator in matrix.annotators() {
        for (counterpart, count) in matrix.counterparts(annotator) {
            rows.push(SummaryRow::Pair {
                annotator: annotator.to_string(),
                counterpart: counterpart.to_string(),
                disagreements: count,
            });
        }
        rows.push(SummaryRow::Total {
            annotator: annotator.to_string(),
            disagreements: matrix.total(annotator),
        });
    }

    rows.push(SummaryRow::Blank);
    rows.push(SummaryRow::Heading);
    for annotator in matrix.annotators() {
        rows.push(SummaryRow::GrandTotal {
            annotator: annotator.to_string(),
            disagreements: matrix.total(annotator),
        });
    }

    rows
}

/// File name of an annotator's workbook (whitespace and path separators → `_`)
pub fn report_file_name(annotator: &str) -> String {
    let stem: String = annotator
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{}_report.xlsx", stem)
}
