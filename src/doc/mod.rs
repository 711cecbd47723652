//! Documentation comments.
//!
//! - [`markers`]: Resolves configured doc characters into comment markers
//! - [`extract`]: Finds block and inline doc comments around a line
//! - [`normalize`](mod@normalize): Rewrites the lightweight doc convention as reST

pub mod extract;
pub mod markers;
pub mod normalize;

pub use extract::{
    doc_text, extract_postdoc, extract_predoc, find_inline_doc, is_doc_line,
    strip_inline_comment, InlineDoc,
};
pub use markers::{parse_doc_chars, resolve_markers};
pub use normalize::normalize;
