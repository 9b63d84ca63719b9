pub mod config;
pub mod report;
pub mod study;

pub use config::{AggregationConfig, ExtractionConfig, PairingMode, PathsConfig, ReportConfig};
pub use report::{DisagreementMatrix, StudyRow, SummaryRow, REPORT_COLUMNS, SUMMARY_COLUMNS};
pub use study::{ParsedExport, Reference, Study, Vote, MISSING};
