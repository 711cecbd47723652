//! Doc comment extraction.
//!
//! Two kinds of documentation are recognized:
//! - block docs: whole lines that start with a marker, written directly above
//!   (predoc) or directly below (postdoc) the statement they describe
//! - inline docs: a marker in the trailing comment of a code line
//!
//! All functions here are pure functions of their inputs.
//!
//! [`find_inline_doc`] and [`strip_inline_comment`] work on one physical line
//! in isolation. The model builder instead reads the comment of each
//! statement segment (which knows whether the line starts inside a string
//! continued from the previous line) and hands it to [`doc_in_comment`].

use std::ops::Range;

use crate::parser::char_filter::comment_start;

/// An inline doc fragment found on a code line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDoc {
    /// Byte offset of the marker in the line
    pub offset: usize,
    pub text: String,
}

/// Text of a doc line, marker and one following space removed
#[must_use]
pub fn doc_text<'a>(line: &'a str, markers: &[String]) -> Option<&'a str> {
    let stripped = line.trim_start();
    // Longest marker first so `!>>` is not read as `!>` followed by `>`
    let marker = markers
        .iter()
        .filter(|m| !m.is_empty() && stripped.starts_with(m.as_str()))
        .max_by_key(|m| m.len())?;
    let rest = &stripped[marker.len()..];
    Some(
        rest.strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
    )
}

#[must_use]
pub fn is_doc_line(line: &str, markers: &[String]) -> bool {
    doc_text(line, markers).is_some()
}

/// First inline doc marker on a single code line
///
/// Markers inside string literals and a marker that opens the line itself
/// (a doc line) do not count. The line is assumed not to start inside a
/// string continued from an earlier line.
#[must_use]
pub fn find_inline_doc(line: &str, markers: &[String]) -> Option<InlineDoc> {
    let start = comment_start(line)?;
    if line[..start].trim().is_empty() {
        return None;
    }
    let (pos, text) = doc_in_comment(&line[start..], markers)?;
    Some(InlineDoc {
        offset: start + pos,
        text,
    })
}

/// Locate the first marker inside a comment (text starting at `!`)
///
/// Returns the marker's offset in `comment` and the trimmed text after it.
#[must_use]
pub fn doc_in_comment(comment: &str, markers: &[String]) -> Option<(usize, String)> {
    let (pos, marker) = markers
        .iter()
        .filter(|m| !m.is_empty())
        .filter_map(|m| comment.find(m.as_str()).map(|pos| (pos, m)))
        .min_by(|(pa, ma), (pb, mb)| pa.cmp(pb).then(mb.len().cmp(&ma.len())))?;
    Some((pos, comment[pos + marker.len()..].trim().to_string()))
}

/// Doc block directly above line `idx`
///
/// Walks upward while lines are doc lines; a blank or code line ends the
/// block. Empty leading/trailing doc lines are dropped.
#[must_use]
pub fn extract_predoc(lines: &[String], idx: usize, markers: &[String]) -> Option<String> {
    let range = doc_block_above(lines, idx, markers);
    join_block(&lines[range], markers)
}

/// Doc block directly below line `idx`
#[must_use]
pub fn extract_postdoc(lines: &[String], idx: usize, markers: &[String]) -> Option<String> {
    let range = doc_block_below(lines, idx, markers);
    join_block(&lines[range], markers)
}

/// Line range of the doc block ending right above `idx`
#[must_use]
pub fn doc_block_above(lines: &[String], idx: usize, markers: &[String]) -> Range<usize> {
    let end = idx.min(lines.len());
    let mut start = end;
    while start > 0 && is_doc_line(&lines[start - 1], markers) {
        start -= 1;
    }
    start..end
}

/// Line range of the doc block starting right below `idx`
#[must_use]
pub fn doc_block_below(lines: &[String], idx: usize, markers: &[String]) -> Range<usize> {
    let start = (idx + 1).min(lines.len());
    let mut end = start;
    while end < lines.len() && is_doc_line(&lines[end], markers) {
        end += 1;
    }
    start..end
}

/// Remove a trailing `!` comment that is not inside a string literal
///
/// Like [`find_inline_doc`], this looks at one physical line only.
#[must_use]
pub fn strip_inline_comment(line: &str) -> &str {
    match comment_start(line) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn join_block(block: &[String], markers: &[String]) -> Option<String> {
    let texts: Vec<&str> = block
        .iter()
        .filter_map(|line| doc_text(line, markers))
        .map(str::trim_end)
        .collect();
    let first = texts.iter().position(|t| !t.is_empty())?;
    let last = texts.iter().rposition(|t| !t.is_empty())?;
    Some(texts[first..=last].join("\n"))
}
