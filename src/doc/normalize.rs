//! Lightweight doc convention to reStructuredText.
//!
//! Supported patterns:
//! - `## Title` section markers become `.. rubric:: Title`
//! - `## See Also` becomes a `.. seealso::` directive; `term : description`
//!   lines are laid out as definitions
//! - contiguous `>>>` lines become a `.. code-block:: fortran`
//! - fenced blocks (```` ```lang ````) become `.. code-block:: lang`
//! - footnote definitions (`.. [1] ...`) get the blank line reST requires
//!
//! Directive lines and their indented bodies are copied verbatim, so feeding
//! the output back in changes nothing.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::build_re;

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\s*##\s+(\S(?:.*\S)?)\s*$"));

static FOOTNOTE_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^\s*\.\.\s*\[(?:\d+|#)\]\s+"));

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\s*\.\.\s+[\w:+-]+::"));

// Spaces are required around the colon so roles like `:f:func:` stay intact
static SEE_ALSO_TERM_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+:\s+"));

const INDENT: &str = "   ";

/// Convert a doc string to reST
#[must_use]
pub fn normalize(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if DIRECTIVE_RE.is_match(line) && !FOOTNOTE_DEF_RE.is_match(line) {
            out.push(line.to_string());
            i += 1;
            while i < lines.len() && is_directive_body(lines[i]) {
                out.push(lines[i].to_string());
                i += 1;
            }
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(line) {
            let title = caps[1].to_string();
            i += 1;
            ensure_blank(&mut out);
            if is_see_also(&title) {
                i = see_also(&lines, i, &mut out);
            } else {
                out.push(format!(".. rubric:: {title}"));
                out.push(String::new());
            }
            continue;
        }

        let stripped = line.trim_start();
        if stripped.starts_with(">>>") {
            ensure_blank(&mut out);
            out.push(".. code-block:: fortran".to_string());
            out.push(String::new());
            while i < lines.len() && lines[i].trim_start().starts_with(">>>") {
                let code = &lines[i].trim_start()[3..];
                let code = code.strip_prefix(' ').unwrap_or(code);
                push_indented(&mut out, code);
                i += 1;
            }
            out.push(String::new());
            continue;
        }

        if let Some(fence) = stripped.strip_prefix("```") {
            let language = match fence.trim() {
                "" => "fortran",
                lang => lang,
            };
            let fence_indent = line.len() - stripped.len();
            ensure_blank(&mut out);
            out.push(format!(".. code-block:: {language}"));
            out.push(String::new());
            i += 1;
            while i < lines.len() {
                let body = lines[i];
                i += 1;
                if body.trim_start().starts_with("```") {
                    break;
                }
                push_indented(&mut out, strip_indent(body, fence_indent));
            }
            out.push(String::new());
            continue;
        }

        if FOOTNOTE_DEF_RE.is_match(line) {
            ensure_blank(&mut out);
        }
        out.push(line.to_string());
        i += 1;
    }

    out.join("\n").trim_end().to_string()
}

fn see_also(lines: &[&str], mut i: usize, out: &mut Vec<String>) -> usize {
    out.push(".. seealso::".to_string());
    out.push(String::new());
    while i < lines.len() && !SECTION_RE.is_match(lines[i]) {
        let body = lines[i].trim();
        i += 1;
        if body.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut parts = SEE_ALSO_TERM_RE.splitn(body, 2);
        match (parts.next(), parts.next()) {
            (Some(term), Some(desc)) => {
                out.push(format!("{INDENT}{}", term.trim()));
                out.push(format!("{INDENT}{INDENT}{}", desc.trim()));
                out.push(String::new());
            }
            _ => out.push(format!("{INDENT}{body}")),
        }
    }
    while out.last().is_some_and(String::is_empty) {
        out.pop();
    }
    out.push(String::new());
    i
}

fn is_see_also(title: &str) -> bool {
    matches!(title.to_ascii_lowercase().as_str(), "see also" | "seealso")
}

fn is_directive_body(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with(' ') || line.starts_with('\t')
}

fn ensure_blank(out: &mut Vec<String>) {
    if out.last().is_some_and(|l| !l.trim().is_empty()) {
        out.push(String::new());
    }
}

fn push_indented(out: &mut Vec<String>, code: &str) {
    if code.trim().is_empty() {
        out.push(String::new());
    } else {
        out.push(format!("{INDENT}{}", code.trim_end()));
    }
}

/// Drop up to `width` leading spaces or tabs
fn strip_indent(line: &str, width: usize) -> &str {
    let leading = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[leading.min(width)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_becomes_rubric() {
        assert_eq!(normalize("## Title\nBody"), ".. rubric:: Title\n\nBody");
    }

    #[test]
    fn test_rubric_gets_blank_line_before() {
        let out = normalize("Summary\n## Notes\nText");
        assert_eq!(out, "Summary\n\n.. rubric:: Notes\n\nText");
    }

    #[test]
    fn test_examples_to_code_block() {
        let text = "## Examples\n>>> call foo(a, b)\n>>> print *, a\n\nTrailing text.";
        let out = normalize(text);
        assert!(out.contains(".. rubric:: Examples"));
        assert!(out.contains(".. code-block:: fortran\n\n   call foo(a, b)\n   print *, a"));
        assert!(!out.contains(">>>"));
        assert!(out.ends_with("Trailing text."));
    }

    #[test]
    fn test_fenced_block_keeps_language_and_indentation() {
        let text = "Intro\n```python\nif x:\n    y()\n```\nAfter";
        let out = normalize(text);
        assert_eq!(
            out,
            "Intro\n\n.. code-block:: python\n\n   if x:\n       y()\n\nAfter"
        );
    }

    #[test]
    fn test_unlabelled_fence_defaults_to_fortran() {
        let out = normalize("```\nx = 1\n```");
        assert!(out.starts_with(".. code-block:: fortran"));
    }

    #[test]
    fn test_fence_body_with_unicode_whitespace() {
        let out = normalize(" ```\n\u{a0}x = 1\n  y = 2\n```");
        assert_eq!(
            out,
            ".. code-block:: fortran\n\n   \u{a0}x = 1\n    y = 2"
        );
    }

    #[test]
    fn test_blank_line_before_footnote() {
        let out = normalize("## References\nCite, e.g. [1]_.\n.. [1] Example reference.");
        assert!(out.contains("e.g. [1]_.\n\n.. [1] Example reference."));
    }

    #[test]
    fn test_see_also_directive() {
        let text = "Summary\n\n## See Also\n:f:func:`matrix_determinant`\n:f:func:`vector_add` : Related vector operation.\n\n## Notes\nMore text.";
        let out = normalize(text);
        assert!(out.contains(".. seealso::"));
        assert!(!out.contains(".. rubric:: See Also"));
        assert!(out.contains("   :f:func:`matrix_determinant`"));
        assert!(out.contains("   :f:func:`vector_add`\n      Related vector operation."));
        assert!(out.contains(".. rubric:: Notes"));
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let text = "Computes the area.\n\nUses the radius.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "## Title\nBody",
            "Summary\n## Notes\nText\n## References\n- A\n.. [1] ref",
            "## Examples\n>>> call foo(a)\n>>> call bar()\nafter",
            "```fortran\n  indented\n\n  more\n```\ntext",
            "Summary\n\n## See Also\n:f:func:`a`\n`b` : thing\n\n## Notes\n   indented note",
            ".. note::\n   ## not a title\n\nplain",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
