//! Symbol extraction pipeline.
//!
//! This module orchestrates a build in two passes:
//!
//! **Pass 1 - Extraction (parallel):**
//! - Read each file into lines and group them into statements
//! - Resolve the block tree (modules, procedures, types, interfaces)
//! - Pair every entity with its doc comments and location
//!
//! **Pass 2 - Merge (sequential):**
//! - Add each file's program units in caller order
//! - Keep the first definition of every name, log the rest
//!
//! The main entry point is [`parse_files`], which returns one read-only
//! [`ParseResult`](crate::model::ParseResult).

pub mod builder;
pub mod merge;

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::model::ParseResult;

pub use builder::{extract_file, extract_source, FileSymbols};
pub use merge::ResultBuilder;

/// Parse files in order and merge their symbols
///
/// Files are extracted in parallel; merging follows the order of `paths`, so
/// collisions resolve the same way on every run. When several files cannot be
/// read, the error reported is the one for the earliest of them in `paths`.
pub fn parse_files(paths: &[PathBuf], markers: &[String]) -> Result<ParseResult> {
    let extracted: Vec<Result<FileSymbols>> = paths
        .par_iter()
        .map(|path| extract_file(path, markers))
        .collect();
    let per_file = extracted.into_iter().collect::<Result<Vec<_>>>()?;

    let mut builder = ResultBuilder::new();
    for symbols in per_file {
        builder.add_file(symbols);
    }
    let result = builder.finish();
    debug!(
        files = paths.len(),
        modules = result.modules().len(),
        submodules = result.submodules().len(),
        programs = result.programs().len(),
        "build finished"
    );
    Ok(result)
}
