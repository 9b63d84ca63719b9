//! Report rows built from parsed studies

use super::study::{Study, MISSING};
use serde_json::Value;
use std::collections::BTreeMap;

/// Column headers of the consolidated and per-annotator sheets
pub const REPORT_COLUMNS: [&str; 12] = [
    "Study ID",
    "Unique Index",
    "Title",
    "Authors",
    "Abstract",
    "Journal Info",
    "Publisher Info",
    "DOI",
    "Annotator 1",
    "Vote 1",
    "Annotator 2",
    "Vote 2",
];

/// Column headers of the disagreement summary sheet
pub const SUMMARY_COLUMNS: [&str; 3] = ["Annotator 1", "Annotator 2", "Disagreements"];

/// Label of the per-annotator subtotal row
pub const TOTAL_LABEL: &str = "Total";

/// Heading that opens the grand-total block of the summary
pub const GRAND_TOTAL_HEADING: &str = "Total Disagreements Across All Annotators:";

/// A study flattened together with one pair of annotators
#[derive(Debug, Clone, PartialEq)]
pub struct StudyRow {
    pub study_id: Value,
    pub unique_index: Value,
    pub title: Value,
    pub authors: Value,
    pub abstract_text: Value,
    pub journal_info: Value,
    pub publisher_info: Value,
    pub doi: Value,
    pub annotator_1: String,
    pub vote_1: String,
    pub annotator_2: String,
    pub vote_2: String,
}

impl StudyRow {
    /// Project a study without any annotator assigned
    pub fn from_study(study: &Study) -> Self {
        Self {
            study_id: study.id.clone(),
            unique_index: study.unique_index.clone(),
            title: study.title.clone(),
            authors: study.authors.clone(),
            abstract_text: study.abstract_text.clone(),
            journal_info: study.journal_info.clone(),
            publisher_info: study.publisher_info.clone(),
            doi: study.doi(),
            annotator_1: MISSING.to_string(),
            vote_1: MISSING.to_string(),
            annotator_2: MISSING.to_string(),
            vote_2: MISSING.to_string(),
        }
    }

    /// Copy of this row with the annotator columns replaced
    pub fn with_annotators(
        &self,
        first: (&str, &str),
        second: (&str, &str),
    ) -> Self {
        Self {
            annotator_1: first.0.to_string(),
            vote_1: first.1.to_string(),
            annotator_2: second.0.to_string(),
            vote_2: second.1.to_string(),
            ..self.clone()
        }
    }

    /// Cells in [`REPORT_COLUMNS`] order
    pub fn cells(&self) -> Vec<Value> {
        vec![
            self.study_id.clone(),
            self.unique_index.clone(),
            self.title.clone(),
            self.authors.clone(),
            self.abstract_text.clone(),
            self.journal_info.clone(),
            self.publisher_info.clone(),
            self.doi.clone(),
            Value::String(self.annotator_1.clone()),
            Value::String(self.vote_1.clone()),
            Value::String(self.annotator_2.clone()),
            Value::String(self.vote_2.clone()),
        ]
    }
}

/// Symmetric count of studies on which two annotators voted differently
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisagreementMatrix {
    counts: BTreeMap<String, BTreeMap<String, u32>>,
}

impl DisagreementMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one disagreement between `a` and `b` in both directions
    pub fn record(&mut self, a: &str, b: &str) {
        *self
            .counts
            .entry(a.to_string())
            .or_default()
            .entry(b.to_string())
            .or_default() += 1;
        *self
            .counts
            .entry(b.to_string())
            .or_default()
            .entry(a.to_string())
            .or_default() += 1;
    }

    pub fn get(&self, a: &str, b: &str) -> u32 {
        self.counts
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Annotators with at least one disagreement, sorted by name
    pub fn annotators(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Counterparts of `a`, most disagreements first, ties by name
    pub fn counterparts(&self, a: &str) -> Vec<(&str, u32)> {
        let mut pairs: Vec<(&str, u32)> = self
            .counts
            .get(a)
            .map(|row| row.iter().map(|(b, n)| (b.as_str(), *n)).collect())
            .unwrap_or_default();
        pairs.sort_by(|x, y| y.1.cmp(&x.1).then_with(|| x.0.cmp(y.0)));
        pairs
    }

    /// Sum of all disagreements involving `a`
    pub fn total(&self, a: &str) -> u32 {
        self.counts
            .get(a)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }
}

/// One row of the disagreement summary sheet
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryRow {
    Pair {
        annotator: String,
        counterpart: String,
        disagreements: u32,
    },
    Total {
        annotator: String,
        disagreements: u32,
    },
    Blank,
    Heading,
    GrandTotal {
        annotator: String,
        disagreements: u32,
    },
}

impl SummaryRow {
    /// Cells in [`SUMMARY_COLUMNS`] order; null cells are left empty
    pub fn cells(&self) -> Vec<Value> {
        match self {
            SummaryRow::Pair {
                annotator,
                counterpart,
                disagreements,
            } => vec![
                Value::from(annotator.as_str()),
                Value::from(counterpart.as_str()),
                Value::from(*disagreements),
            ],
            SummaryRow::Total {
                annotator,
                disagreements,
            } => vec![
                Value::from(annotator.as_str()),
                Value::from(TOTAL_LABEL),
                Value::from(*disagreements),
            ],
            SummaryRow::Blank => vec![Value::Null, Value::Null, Value::Null],
            SummaryRow::Heading => vec![Value::from(GRAND_TOTAL_HEADING), Value::Null, Value::Null],
            SummaryRow::GrandTotal {
                annotator,
                disagreements,
            } => vec![
                Value::from(annotator.as_str()),
                Value::Null,
                Value::from(*disagreements),
            ],
        }
    }
}
