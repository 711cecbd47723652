//! Fortran scope tracking.
//!
//! This module tracks nested Fortran constructs that carry symbols:
//! - Program units: MODULE, SUBMODULE, PROGRAM
//! - Subprograms: SUBROUTINE, FUNCTION, separate MODULE PROCEDURE bodies
//! - INTERFACE blocks and derived TYPE definitions
//!
//! [`resolve_spans`] pairs each opening statement with its `end` statement and
//! returns the block tree of a file, while [`ScopeKind`] categorizes each block
//! and decides where it may legally open.

pub mod spans;
pub mod types;

pub use spans::{resolve_spans, Block};
pub use types::ScopeKind;
