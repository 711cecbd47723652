//! Fortran source code parsing utilities.
//!
//! This module provides the infrastructure for reading and recognizing Fortran source:
//! - [`scanner`]: Reads source files into physical lines
//! - [`CharFilter`]: Iterator adapter that identifies strings, comments, and code regions
//! - [`StatementStream`]: Joins continuation lines (`&`) and separates trailing comments
//! - [`patterns`]: Precompiled regex patterns for Fortran syntax elements
//! - [`recognize`]: Typed recognizers for the constructs that carry symbols
//!
//! Recognition works on the comment-free code of logical statements. Physical
//! line indices are kept on every statement so that documentation comments can
//! be paired with the code around them.

pub mod char_filter;
pub mod patterns;
pub mod recognize;
pub mod scanner;
pub mod stream;

pub use char_filter::{CharFilter, StringDelimiter};
pub use stream::{statements, Segment, Statement, StatementStream};
