//! Configuration management for fdoc.
//!
//! [`Config`] controls one documentation build. Values are layered:
//! built-in defaults, then `fdoc.toml` files (home directory first, then each
//! ancestor of the working directory down to the nearest), then command-line
//! flags applied by the binary.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::doc::markers::{parse_doc_chars, resolve_markers};
use crate::error::Result;
use crate::lexer::RegexLexer;

/// File names looked up in every searched directory
const CONFIG_FILE_NAMES: &[&str] = &["fdoc.toml"];

/// Home directory from `HOME`, falling back to `USERPROFILE`
fn dirs_home() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .iter()
        .find_map(|var| std::env::var_os(var))
        .map(PathBuf::from)
}

fn default_doc_chars() -> String {
    ">".to_string()
}
fn default_lexer() -> String {
    RegexLexer::NAME.to_string()
}

/// Main configuration struct for fdoc
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Characters that follow `!` to mark a doc comment (default: ">")
    #[serde(default = "default_doc_chars")]
    pub doc_chars: String,

    /// Registry name of the lexer to use (default: "regex")
    #[serde(default = "default_lexer")]
    pub lexer: String,

    /// Rewrite doc strings as reStructuredText before output (default: false)
    #[serde(default)]
    pub normalize_docs: bool,
}

/// One config file as written
///
/// Keys left out of the file stay `None` and do not override earlier layers.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub doc_chars: Option<String>,
    pub lexer: Option<String>,
    pub normalize_docs: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            doc_chars: default_doc_chars(),
            lexer: default_lexer(),
            normalize_docs: false,
        }
    }
}

impl Config {
    /// Describe the first unusable value, if any
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if parse_doc_chars(&self.doc_chars).is_empty() {
            return Some("doc_chars must contain at least one character".to_string());
        }
        if self.lexer.trim().is_empty() {
            return Some("lexer must not be empty".to_string());
        }
        None
    }

    /// Doc comment markers for the configured doc characters
    pub fn doc_markers(&self) -> Result<Vec<String>> {
        resolve_markers(&parse_doc_chars(&self.doc_chars))
    }

    /// Defaults overlaid with a single `fdoc.toml`
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let partial: PartialConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Overlay the keys present in `partial`
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = &partial.doc_chars {
            self.doc_chars.clone_from(v);
        }
        if let Some(v) = &partial.lexer {
            self.lexer.clone_from(v);
        }
        if let Some(v) = partial.normalize_docs {
            self.normalize_docs = v;
        }
    }

    /// Config files that apply to `start_dir`, least specific first
    ///
    /// The home directory comes first, then every ancestor of `start_dir` from
    /// the filesystem root down to `start_dir` itself.
    #[must_use]
    pub fn discover_config_files(start_dir: &Path) -> Vec<PathBuf> {
        let mut ancestors: Vec<&Path> = start_dir.ancestors().collect();
        ancestors.reverse();
        let home = dirs_home();
        let dirs = home.as_deref().into_iter().chain(ancestors);

        let mut found: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            let candidates = CONFIG_FILE_NAMES.iter().map(|name| dir.join(name));
            for candidate in candidates.filter(|c| c.is_file()) {
                if !found.contains(&candidate) {
                    found.push(candidate);
                }
            }
        }
        found
    }

    /// Defaults overlaid with every discovered file, nearest last
    ///
    /// A file that cannot be read or parsed is skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_dir: &Path) -> Self {
        let mut merged = Self::default();
        for path in Self::discover_config_files(start_dir) {
            let layer = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| toml::from_str::<PartialConfig>(&text).map_err(|e| e.to_string()));
            match layer {
                Ok(partial) => {
                    debug!(path = %path.display(), "loaded config file");
                    merged.apply_partial(&partial);
                }
                Err(error) => warn!(path = %path.display(), %error, "skipping config file"),
            }
        }
        merged
    }
}
