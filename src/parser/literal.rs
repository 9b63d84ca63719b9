//! Embedded Object Literal Repair
//!
//! The conflict page hands its study payload to
//! `Covidence.StudiesController.initialize(...)` as a JavaScript object
//! literal. This module cuts that literal out of the script text and rewrites
//! the one malformed dialect the export produces into JSON:
//! - free text in `title` / `abstract` values with stray colons and quotes
//! - escaped quotes around the rest of the payload
//! - bareword keys
//! - trailing commas
//!
//! Everything here is a pure function of the input text so it can be exercised
//! against samples without touching the filesystem.

use regex::Regex;
use serde_json::Value;

/// Ordinal (0-based) of the `{` that opens the payload in the export's script
pub const DEFAULT_BRACE_ORDINAL: usize = 3;

/// Fields whose values carry free text that is normalized before key quoting
pub const FREE_TEXT_FIELDS: [&str; 2] = ["title", "abstract"];

/// Result type for literal repair
pub type LiteralResult<T> = Result<T, LiteralError>;

/// Reasons a script block could not be turned into structured data
#[derive(Debug, thiserror::Error)]
pub enum LiteralError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("JSON decoding error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
        repaired: String,
    },

    #[error("Error repairing literal: {message}")]
    Repair { message: String, partial: String },
}

impl LiteralError {
    /// Short name of the failure kind for reports
    pub fn kind(&self) -> &'static str {
        match self {
            LiteralError::MalformedInput(_) => "malformed input",
            LiteralError::Parse { .. } => "parse error",
            LiteralError::Repair { .. } => "repair error",
        }
    }

    /// Text that was being worked on when the failure happened, if any
    pub fn diagnostic_text(&self) -> Option<&str> {
        match self {
            LiteralError::MalformedInput(_) => None,
            LiteralError::Parse { repaired, .. } => Some(repaired),
            LiteralError::Repair { partial, .. } => Some(partial),
        }
    }

    /// Line/column of a parse failure
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            LiteralError::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Locate, repair and parse the payload literal in a script block
///
/// # Arguments
/// * `script` - Full text of the `<script>` element
/// * `brace_ordinal` - Which `{` (0-based) opens the payload
pub fn parse_literal(script: &str, brace_ordinal: usize) -> LiteralResult<Value> {
    let literal = locate_literal(script, brace_ordinal)?;
    let repaired = repair_literal(literal)?;

    serde_json::from_str(&repaired).map_err(|e| {
        let mut message = e.to_string();
        if let Some(idx) = message.rfind(" at line ") {
            message.truncate(idx);
        }
        LiteralError::Parse {
            line: e.line(),
            column: e.column(),
            message,
            repaired,
        }
    })
}

/// Cut the brace-balanced literal starting at the `brace_ordinal`-th `{`
pub fn locate_literal(script: &str, brace_ordinal: usize) -> LiteralResult<&str> {
    let start = script
        .match_indices('{')
        .nth(brace_ordinal)
        .map(|(idx, _)| idx)
        .ok_or_else(|| {
            LiteralError::MalformedInput(format!(
                "Unable to find opening bracket #{} in the script",
                brace_ordinal + 1
            ))
        })?;

    let mut depth = 0usize;
    for (offset, ch) in script[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&script[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(LiteralError::MalformedInput(
        "Could not locate the end of the object literal".to_string(),
    ))
}

/// Apply the text repairs that turn the export's literal into JSON
///
/// Steps run in a fixed order; each later step relies on the earlier ones
/// having removed quotes and colons from free text.
pub fn repair_literal(literal: &str) -> LiteralResult<String> {
    let mut repaired = literal.to_string();

    for field in FREE_TEXT_FIELDS {
        repaired = normalize_free_text(&repaired, field)?;
    }

    repaired = repaired.replace("\\\"", "\"");

    let bare_key = compile(r"([{,])\s*([\w$]+)\s*:", &repaired)?;
    repaired = bare_key.replace_all(&repaired, r#"${1}"${2}":"#).into_owned();

    let trailing_comma = compile(r",\s*([}\]])", &repaired)?;
    repaired = trailing_comma.replace_all(&repaired, "${1}").into_owned();

    Ok(repaired)
}

fn compile(pattern: &str, partial: &str) -> LiteralResult<Regex> {
    Regex::new(pattern).map_err(|e| LiteralError::Repair {
        message: format!("invalid pattern {}: {}", pattern, e),
        partial: partial.to_string(),
    })
}

/// Rewrite every `field: "..."` pair so its value holds no colons or quotes
///
/// The key may be quoted or bare. A value ends at the first unescaped `"`
/// followed by `,`, `}`, `]` or the end of the text, which lets unescaped
/// quotes inside the free text survive as part of the value. Pairs whose end
/// cannot be found are left alone.
fn normalize_free_text(content: &str, field: &str) -> LiteralResult<String> {
    let pattern = format!(r#"(?:"{0}"|\b{0})\s*:\s*""#, regex::escape(field));
    let key = compile(&pattern, content)?;

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;

    for m in key.find_iter(content) {
        if m.start() < cursor {
            continue;
        }
        let value_start = m.end();
        let Some(value_end) = find_value_end(content, value_start) else {
            continue;
        };

        out.push_str(&content[cursor..m.start()]);
        out.push_str(&format!(
            "\"{}\": \"{}\"",
            field,
            scrub_free_text(&content[value_start..value_end])
        ));
        cursor = value_end + 1;
    }

    out.push_str(&content[cursor..]);
    Ok(out)
}

/// Byte offset of the quote that closes a string value starting at `start`
fn find_value_end(content: &str, start: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut idx = start;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'"' => {
                let next = bytes[idx + 1..]
                    .iter()
                    .find(|b| !b.is_ascii_whitespace());
                match next {
                    None | Some(b',') | Some(b'}') | Some(b']') => return Some(idx),
                    _ => idx += 1,
                }
            }
            _ => idx += 1,
        }
    }

    None
}

fn scrub_free_text(text: &str) -> String {
    text.replace(':', "")
        .replace("\\\"", "'")
        .replace('"', "'")
}

// =============================================================================
// Tests
// =============================================================================
