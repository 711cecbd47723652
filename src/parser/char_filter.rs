/// `CharFilter` - Iterator that tells code apart from strings and comments
///
/// Wraps a `char_indices` iterator and tracks whether the cursor is inside a
/// quoted literal or a trailing `!` comment. Doc markers and comment
/// delimiters are only searched for in actual code so that `"!>"` inside a
/// string never starts documentation.

/// Type of string delimiter we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Single, // '...'
    Double, // "..."
}

/// Iterator adapter yielding `(byte position, char)` pairs
///
/// Depending on the flags, string contents and/or comments are skipped.
pub struct CharFilter<'a> {
    chars: std::str::CharIndices<'a>,
    instring: StringDelimiter,
    incomment: bool,
    filter_comments: bool,
    filter_strings: bool,
}

impl<'a> CharFilter<'a> {
    /// Create a new `CharFilter`
    ///
    /// # Arguments
    /// * `content` - The string to iterate over
    /// * `filter_comments` - Whether to skip comments (starting with !)
    /// * `filter_strings` - Whether to skip string literals, quotes included
    #[must_use]
    pub fn new(content: &'a str, filter_comments: bool, filter_strings: bool) -> Self {
        Self::with_string_state(content, filter_comments, filter_strings, StringDelimiter::None)
    }

    /// Create a `CharFilter` that starts inside a string
    ///
    /// Used for continuation lines of a literal split with `&`.
    #[must_use]
    pub fn with_string_state(
        content: &'a str,
        filter_comments: bool,
        filter_strings: bool,
        string_state: StringDelimiter,
    ) -> Self {
        Self {
            chars: content.char_indices(),
            instring: string_state,
            incomment: false,
            filter_comments,
            filter_strings,
        }
    }

    #[must_use]
    pub fn instring(&self) -> bool {
        self.instring != StringDelimiter::None
    }

    #[must_use]
    pub fn incomment(&self) -> bool {
        self.incomment
    }

    /// Delimiter of the literal the cursor is inside, if any
    #[must_use]
    pub fn string_state(&self) -> StringDelimiter {
        self.instring
    }

    /// Collect the unfiltered characters into a string
    pub fn filter_all(&mut self) -> String {
        self.by_ref().map(|(_, c)| c).collect()
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, c) = self.chars.next()?;

            if self.incomment {
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            match self.instring {
                StringDelimiter::None => match c {
                    '!' => {
                        self.incomment = true;
                        if self.filter_comments {
                            continue;
                        }
                    }
                    '\'' | '"' => {
                        self.instring = if c == '\'' {
                            StringDelimiter::Single
                        } else {
                            StringDelimiter::Double
                        };
                        if self.filter_strings {
                            continue;
                        }
                    }
                    _ => {}
                },
                StringDelimiter::Single | StringDelimiter::Double => {
                    // A doubled quote ('it''s') closes and immediately reopens,
                    // which leaves the state correct without lookahead.
                    let closing = (c == '\'' && self.instring == StringDelimiter::Single)
                        || (c == '"' && self.instring == StringDelimiter::Double);
                    if closing {
                        self.instring = StringDelimiter::None;
                    }
                    if self.filter_strings {
                        continue;
                    }
                }
            }

            return Some((pos, c));
        }
    }
}

/// Byte offset of the `!` that opens the trailing comment, if any
#[must_use]
pub fn comment_start(line: &str) -> Option<usize> {
    comment_start_from(line, StringDelimiter::None)
}

/// Like [`comment_start`], for a line that begins inside a literal
#[must_use]
pub fn comment_start_from(line: &str, string_state: StringDelimiter) -> Option<usize> {
    let mut filter = CharFilter::with_string_state(line, false, false, string_state);
    while let Some((pos, c)) = filter.next() {
        if c == '!' && filter.incomment() {
            return Some(pos);
        }
    }
    None
}

/// String state after scanning the code part of `line`
#[must_use]
pub fn string_state_after(line: &str, string_state: StringDelimiter) -> StringDelimiter {
    let mut filter = CharFilter::with_string_state(line, true, false, string_state);
    for _ in filter.by_ref() {}
    filter.string_state()
}
