//! Merging per-file results into one [`ParseResult`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::warn;

use super::builder::FileSymbols;
use crate::model::{symbol_key, Module, ParseResult, Program, SourceLocation, Submodule};

/// Accumulates program units across files
///
/// The first definition of a name wins; later duplicates are dropped and
/// logged.
#[derive(Debug, Default)]
pub struct ResultBuilder {
    modules: BTreeMap<String, Module>,
    submodules: BTreeMap<String, Submodule>,
    programs: BTreeMap<String, Program>,
}

impl ResultBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add everything found in one file, in source order
    pub fn add_file(&mut self, symbols: FileSymbols) {
        for module in symbols.modules {
            self.add_module(module);
        }
        for submodule in symbols.submodules {
            self.add_submodule(submodule);
        }
        for program in symbols.programs {
            self.add_program(program);
        }
    }

    /// Returns `false` when the name was already taken
    pub fn add_module(&mut self, module: Module) -> bool {
        insert_first(&mut self.modules, "module", module)
    }

    pub fn add_submodule(&mut self, submodule: Submodule) -> bool {
        insert_first(&mut self.submodules, "submodule", submodule)
    }

    pub fn add_program(&mut self, program: Program) -> bool {
        insert_first(&mut self.programs, "program", program)
    }

    #[must_use]
    pub fn finish(self) -> ParseResult {
        ParseResult::from_parts(self.modules, self.submodules, self.programs)
    }
}

trait Unit {
    fn name(&self) -> &str;
    fn location(&self) -> Option<&SourceLocation>;
}

macro_rules! impl_unit {
    ($($ty:ty),*) => {
        $(
            impl Unit for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn location(&self) -> Option<&SourceLocation> {
                    self.location.as_ref()
                }
            }
        )*
    };
}

impl_unit!(Module, Submodule, Program);

fn insert_first<T: Unit>(map: &mut BTreeMap<String, T>, kind: &str, unit: T) -> bool {
    match map.entry(symbol_key(unit.name())) {
        Entry::Vacant(slot) => {
            slot.insert(unit);
            true
        }
        Entry::Occupied(existing) => {
            warn!(
                kind,
                name = unit.name(),
                kept = %describe(existing.get().location()),
                dropped = %describe(unit.location()),
                "duplicate definition ignored"
            );
            false
        }
    }
}

fn describe(location: Option<&SourceLocation>) -> String {
    location.map_or_else(|| "<unknown>".to_string(), ToString::to_string)
}
