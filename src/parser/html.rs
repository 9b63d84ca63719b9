//! Script block scanning for exported HTML pages

use anyhow::{anyhow, Result};
use scraper::{Html, Selector};

/// A `<script>` element whose text carries the payload marker
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBlock {
    /// Position among all `<script>` elements of the document (0-based)
    pub index: usize,
    /// Raw script text
    pub text: String,
}

/// Collect the text of every `<script>` element that contains `marker`,
/// in document order
pub fn find_script_blocks(html: &str, marker: &str) -> Result<Vec<ScriptBlock>> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("script").map_err(|e| anyhow!("Invalid script selector: {:?}", e))?;

    let blocks = document
        .select(&selector)
        .enumerate()
        .filter_map(|(index, element)| {
            let text: String = element.text().collect();
            text.contains(marker).then_some(ScriptBlock { index, text })
        })
        .collect();

    Ok(blocks)
}
