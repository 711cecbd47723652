//! fdoc - Documented symbol extraction for modern Fortran sources
//!
//! Parses free-form Fortran into a symbol model (modules, submodules,
//! programs, procedures, derived types) paired with their `!>` doc comments.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod doc;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod process;
pub mod scope;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use doc::{normalize, resolve_markers};
pub use error::{Error, Result};
pub use lexer::{Lexer, LexerRegistry, RegexLexer};
pub use model::{
    Argument, Component, DerivedType, GenericInterface, Intent, Module, ParseResult, Procedure,
    ProcedureKind, Program, SourceLocation, Submodule, TypeBoundProcedure,
};
pub use process::parse_files;
