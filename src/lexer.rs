//! Lexer contract and registry.
//!
//! A lexer turns an ordered list of source files into a [`ParseResult`].
//! Lexers are looked up by name in a [`LexerRegistry`], which is an explicit
//! value: callers build one with [`LexerRegistry::with_builtin`] and may
//! register their own factories on top.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::ParseResult;
use crate::process::parse_files;

/// A source-to-symbol-model parser
pub trait Lexer: Send + Sync {
    /// Registry key this lexer is known by
    fn name(&self) -> &str;

    /// Parse `file_paths` in order
    ///
    /// `doc_markers` are full comment markers such as `!>`.
    fn parse(&self, file_paths: &[PathBuf], doc_markers: &[String]) -> Result<ParseResult>;
}

/// Built-in lexer based on statement recognizers and span resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexLexer;

impl RegexLexer {
    pub const NAME: &'static str = "regex";
}

impl Lexer for RegexLexer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, file_paths: &[PathBuf], doc_markers: &[String]) -> Result<ParseResult> {
        parse_files(file_paths, doc_markers)
    }
}

type LexerFactory = Box<dyn Fn() -> Box<dyn Lexer> + Send + Sync>;

/// Name to lexer-factory mapping
#[derive(Default)]
pub struct LexerRegistry {
    factories: HashMap<String, LexerFactory>,
}

impl LexerRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in lexers
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(RegexLexer::NAME.to_string(), Box::new(regex_lexer));
        registry
    }

    /// Register (or replace) a lexer factory
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Lexer> + Send + Sync + 'static,
    {
        let key = registry_key(name)?;
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Instantiate the lexer registered under `name`
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Lexer>> {
        let key = registry_key(name)?;
        match self.factories.get(&key) {
            Some(factory) => Ok(factory()),
            None => Err(Error::configuration(format!(
                "unknown lexer '{key}'; available lexers: {}",
                self.available().join(", ")
            ))),
        }
    }

    /// Registered names, sorted
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for LexerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexerRegistry")
            .field("lexers", &self.available())
            .finish()
    }
}

fn regex_lexer() -> Box<dyn Lexer> {
    Box::new(RegexLexer)
}

fn registry_key(name: &str) -> Result<String> {
    let key = name.trim().to_ascii_lowercase();
    if key.is_empty() {
        return Err(Error::configuration("lexer name is empty"));
    }
    Ok(key)
}
