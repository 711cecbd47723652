//! Error types and result aliases for fdoc.
//!
//! This module defines the error handling infrastructure:
//! - [`Error`]: The two failures that abort a build (bad configuration, unreadable source)
//! - [`Result<T>`]: Type alias for `std::result::Result<T, Error>` used throughout the crate
//!
//! Recognition mismatches and duplicate entity names are never errors; they are
//! skipped or logged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unusable configuration: empty doc character list, unknown lexer, ...
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A source file could not be opened or read
    #[error("failed to read source file {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
