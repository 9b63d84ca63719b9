// Covidence Conflicts - recover study votes from conflict-resolution exports
// and report where annotators disagree

pub mod cli;
pub mod models;
pub mod parser;
pub mod services;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{DisagreementMatrix, ParsedExport, ReportConfig, Study, StudyRow, Vote};
pub use parser::{parse_literal, LiteralError};
