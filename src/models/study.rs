use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder written wherever a voter or vote is absent
pub const MISSING: &str = "N/A";

/// Repaired payload of one script block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedExport {
    #[serde(default)]
    pub studies: Vec<Study>,
}

/// One review item with the votes cast on it
///
/// Scalar fields stay as JSON values because the export mixes numeric and
/// string ids and leaves text fields null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Study {
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub unique_index: Value,

    #[serde(default)]
    pub title: Value,

    #[serde(default)]
    pub authors: Value,

    #[serde(default, rename = "abstract")]
    pub abstract_text: Value,

    #[serde(default)]
    pub journal_info: Value,

    #[serde(default)]
    pub publisher_info: Value,

    #[serde(default)]
    pub references: Option<Vec<Reference>>,

    #[serde(default)]
    pub votes: Option<Vec<Vote>>,
}

impl Study {
    /// DOI of the first reference, or null when there are no references
    pub fn doi(&self) -> Value {
        self.references
            .as_ref()
            .and_then(|refs| refs.first())
            .map(|r| r.doi.clone())
            .unwrap_or(Value::Null)
    }

    pub fn votes(&self) -> &[Vote] {
        self.votes.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub doi: Value,
}

/// A reviewer's decision on a study
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vote {
    #[serde(default)]
    pub reviewer_name: Value,

    #[serde(default)]
    pub vote: Value,
}

impl Vote {
    pub fn new(reviewer: &str, vote: &str) -> Self {
        Self {
            reviewer_name: Value::String(reviewer.to_string()),
            vote: Value::String(vote.to_string()),
        }
    }

    pub fn reviewer(&self) -> String {
        text_or_missing(&self.reviewer_name)
    }

    pub fn decision(&self) -> String {
        text_or_missing(&self.vote)
    }
}

/// Render a JSON scalar as text, using [`MISSING`] for null
pub fn text_or_missing(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// True for votes that must never count towards a disagreement
pub fn is_missing(vote: &str) -> bool {
    vote == MISSING
}
