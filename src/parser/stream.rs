/// `StatementStream` - Converts physical lines to logical Fortran statements
///
/// This module handles:
/// - Joining line continuations (lines ending with &)
/// - Separating comments from code, per physical line
/// - Skipping blank and comment-only lines
/// - Multiline strings (tracking string state across lines)
use super::char_filter::{comment_start_from, string_state_after, StringDelimiter};

/// The code and trailing comment of one physical line of a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 0-based physical line index
    pub line: usize,
    /// Code with the comment and continuation ampersands removed
    pub code: String,
    /// Trailing comment, starting at its `!`
    pub comment: Option<String>,
}

/// A logical Fortran statement with associated metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 0-based index of the first physical line
    pub start: usize,
    /// 0-based index of the last physical line
    pub end: usize,
    /// The logical statement (continuations joined, comments removed)
    pub code: String,
    /// One entry per physical line that contributed code
    pub segments: Vec<Segment>,
}

impl Statement {
    /// Segment for a given physical line, if that line holds code
    #[must_use]
    pub fn segment(&self, line: usize) -> Option<&Segment> {
        self.segments.iter().find(|s| s.line == line)
    }
}

/// `StatementStream` reads logical statements from a slice of physical lines
pub struct StatementStream<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> StatementStream<'a> {
    #[must_use]
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }
}

impl Iterator for StatementStream<'_> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut string_state = StringDelimiter::None;

        while self.pos < self.lines.len() {
            let idx = self.pos;
            let raw = self.lines[idx].as_str();
            self.pos += 1;

            let (code, comment) = split_comment(raw, string_state);
            string_state = string_state_after(code, string_state);

            let in_continuation = !segments.is_empty();
            let is_comment_only = code.trim().is_empty();

            if is_comment_only {
                // Blank and comment-only lines never hold statement code,
                // not even in the middle of a continuation
                continue;
            }

            let mut part = code.trim_end();
            if in_continuation {
                let trimmed = part.trim_start();
                part = trimmed.strip_prefix('&').unwrap_or(trimmed);
            }

            let has_explicit_continuation = part.ends_with('&');
            if has_explicit_continuation {
                part = part.trim_end_matches('&').trim_end();
            }

            segments.push(Segment {
                line: idx,
                code: part.to_string(),
                comment: comment.map(str::to_string),
            });

            if !has_explicit_continuation {
                break;
            }
        }

        let first = segments.first()?;
        let start = first.line;
        let end = segments.last().map_or(start, |s| s.line);

        // Join the logical line (trim continuation parts)
        let mut joined = first.code.clone();
        for part in &segments[1..] {
            let piece = part.code.trim();
            if piece.is_empty() {
                continue;
            }
            joined.push(' ');
            joined.push_str(piece);
        }

        Some(Statement {
            start,
            end,
            code: joined,
            segments,
        })
    }
}

/// Split all statements of a file
#[must_use]
pub fn statements(lines: &[String]) -> Vec<Statement> {
    StatementStream::new(lines).collect()
}

/// Split code and comment parts
fn split_comment(line: &str, string_state: StringDelimiter) -> (&str, Option<&str>) {
    match comment_start_from(line, string_state) {
        Some(pos) => (&line[..pos], Some(&line[pos..])),
        None => (line, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_single_line() {
        let src = lines("x = 5");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].code, "x = 5");
        assert_eq!((stmts[0].start, stmts[0].end), (0, 0));
    }

    #[test]
    fn test_continuation() {
        let src = lines("x = &\n5");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].code, "x = 5");
        assert_eq!(stmts[0].segments.len(), 2);
        assert_eq!(stmts[0].end, 1);
    }

    #[test]
    fn test_multiple_continuations() {
        let src = lines("x = &\n  1 + &\n  & 2");
        let stmts = statements(&src);
        assert_eq!(stmts[0].code, "x = 1 + 2");
        assert_eq!(stmts[0].segments.len(), 3);
    }

    #[test]
    fn test_comment() {
        let src = lines("x = 5 ! this is a comment");
        let stmts = statements(&src);
        assert_eq!(stmts[0].code, "x = 5");
        assert_eq!(
            stmts[0].segments[0].comment.as_deref(),
            Some("! this is a comment")
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let src = lines("! header\n\nx = 1\n   \n!> doc\ny = 2");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].start, 2);
        assert_eq!(stmts[1].start, 5);
    }

    #[test]
    fn test_continuation_with_comment() {
        let src = lines("subroutine s(a, & !> first\n  b)  !> second");
        let stmts = statements(&src);
        assert_eq!(stmts[0].code, "subroutine s(a, b)");
        assert_eq!(stmts[0].segments[0].comment.as_deref(), Some("!> first"));
        assert_eq!(stmts[0].segments[1].comment.as_deref(), Some("!> second"));
        assert_eq!(stmts[0].segment(1).unwrap().code, "b)");
    }

    #[test]
    fn test_continuation_with_comment_in_middle() {
        let src = lines("end &\n! comment\ndo");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].code.trim(), "end do");
        assert_eq!((stmts[0].start, stmts[0].end), (0, 2));
        assert_eq!(stmts[0].segments.len(), 2);
    }

    #[test]
    fn test_bang_in_string_is_code() {
        let src = lines(r#"print *, "a ! b" ! note"#);
        let stmts = statements(&src);
        assert_eq!(stmts[0].code, r#"print *, "a ! b""#);
    }

    #[test]
    fn test_string_continued_across_lines() {
        let src = lines("msg = 'part one &\n  &part ! two' ! real comment");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 1);
        assert_eq!(
            stmts[0].segments[1].comment.as_deref(),
            Some("! real comment")
        );
    }

    #[test]
    fn test_string_no_false_continuation() {
        let src = lines("x = 'test'\ny = 5");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].code, "x = 'test'");
        assert_eq!(stmts[1].code, "y = 5");
    }

    #[test]
    fn test_unterminated_continuation_at_eof() {
        let src = lines("x = &");
        let stmts = statements(&src);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].code, "x =");
    }

    #[test]
    fn test_empty_input() {
        assert!(statements(&[]).is_empty());
    }
}
