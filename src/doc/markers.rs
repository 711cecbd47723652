//! Doc-comment marker resolution.

use crate::error::{Error, Result};

/// Turn doc characters into comment markers (`>` becomes `!>`)
///
/// Order follows the input; a repeated character only yields its first
/// marker.
pub fn resolve_markers(doc_chars: &[char]) -> Result<Vec<String>> {
    if doc_chars.is_empty() {
        return Err(Error::configuration(
            "doc character list is empty; at least one doc character is required",
        ));
    }

    let mut markers: Vec<String> = Vec::with_capacity(doc_chars.len());
    for c in doc_chars {
        let marker = format!("!{c}");
        if !markers.contains(&marker) {
            markers.push(marker);
        }
    }
    Ok(markers)
}

/// Characters of a configured doc-chars string, whitespace ignored
#[must_use]
pub fn parse_doc_chars(value: &str) -> Vec<char> {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
