//! Symbol model produced by the lexers.
//!
//! Every record is a plain owned value. Optional facts (`doc`, `location`,
//! `result`, ...) are `Option`s rather than missing keys. The top-level
//! [`ParseResult`] is assembled once per build by
//! [`ResultBuilder`](crate::process::ResultBuilder) and is read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// Where an entity's declaring statement starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub path: String,
    /// 1-based
    pub lineno: usize,
}

impl SourceLocation {
    #[must_use]
    pub fn new(path: impl Into<String>, lineno: usize) -> Self {
        Self {
            path: path.into(),
            lineno,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.lineno)
    }
}

/// Dummy-argument intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    In,
    Out,
    InOut,
    #[default]
    None,
}

impl Intent {
    /// Parse the text inside `intent(...)`, e.g. `in`, `inout`, `in out`
    #[must_use]
    pub fn from_spec(spec: &str) -> Self {
        let compact: String = spec
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "in" => Intent::In,
            "out" => Intent::Out,
            "inout" => Intent::InOut,
            _ => Intent::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub intent: Intent,
    pub doc: Option<String>,
    /// Type specification, e.g. `real(dp), intent(in), dimension(:)`
    pub decl: Option<String>,
    pub location: Option<SourceLocation>,
}

impl Argument {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intent: Intent::None,
            doc: None,
            decl: None,
            location: None,
        }
    }
}

/// A derived-type field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub name: String,
    pub doc: Option<String>,
    pub decl: Option<String>,
    pub location: Option<SourceLocation>,
}

/// A type-bound procedure binding (`procedure :: name => target`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBoundProcedure {
    pub name: String,
    /// Implementing procedure; `None` for deferred bindings
    pub target: Option<String>,
    pub doc: Option<String>,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedType {
    pub name: String,
    pub doc: Option<String>,
    /// Parent type from `extends(...)`
    pub extends: Option<String>,
    pub components: Vec<Component>,
    pub type_bound_procedures: Vec<TypeBoundProcedure>,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Function,
    Subroutine,
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureKind::Function => write!(f, "function"),
            ProcedureKind::Subroutine => write!(f, "subroutine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Procedure {
    pub name: String,
    pub kind: ProcedureKind,
    pub arguments: Vec<Argument>,
    /// Result variable, functions only
    pub result: Option<Argument>,
    /// Header as displayed, e.g. `pure function foo(a) -> res`
    pub signature: Option<String>,
    pub doc: Option<String>,
    pub location: Option<SourceLocation>,
}

impl Procedure {
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// A named interface block (`interface swap ... end interface`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericInterface {
    /// Generic name or operator spec as written
    pub name: String,
    pub doc: Option<String>,
    /// Specific procedures, in the order the block lists them
    pub procedures: Vec<String>,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub doc: Option<String>,
    pub procedures: Vec<Procedure>,
    pub types: Vec<DerivedType>,
    /// Signatures declared in interface blocks
    pub interfaces: Vec<Procedure>,
    pub generics: Vec<GenericInterface>,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submodule {
    pub name: String,
    pub parent_module: String,
    pub doc: Option<String>,
    pub procedures: Vec<Procedure>,
    pub types: Vec<DerivedType>,
    pub interfaces: Vec<Procedure>,
    pub generics: Vec<GenericInterface>,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub name: String,
    pub doc: Option<String>,
    /// Modules named by `use` statements in the main program body
    pub dependencies: BTreeSet<String>,
    /// Internal procedures (after `contains`)
    pub procedures: Vec<Procedure>,
    /// Raw text from the `program` line through `end program`
    pub source: Option<String>,
    pub location: Option<SourceLocation>,
}

/// Lookup helpers shared by the entities that own procedures and types
macro_rules! impl_unit_lookups {
    ($($unit:ty),*) => {
        $(
            impl $unit {
                #[must_use]
                pub fn procedure(&self, name: &str) -> Option<&Procedure> {
                    self.procedures
                        .iter()
                        .find(|p| p.name.eq_ignore_ascii_case(name))
                }
            }
        )*
    };
}

impl_unit_lookups!(Module, Submodule, Program);

impl Module {
    #[must_use]
    pub fn derived_type(&self, name: &str) -> Option<&DerivedType> {
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn generic(&self, name: &str) -> Option<&GenericInterface> {
        self.generics
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }
}

/// The merged symbol model of one documentation build.
///
/// Keys are lower-cased identifiers; each entity keeps its authored spelling
/// in `name`. There is no way to mutate a `ParseResult` once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    modules: BTreeMap<String, Module>,
    submodules: BTreeMap<String, Submodule>,
    programs: BTreeMap<String, Program>,
}

impl ParseResult {
    pub(crate) fn from_parts(
        modules: BTreeMap<String, Module>,
        submodules: BTreeMap<String, Submodule>,
        programs: BTreeMap<String, Program>,
    ) -> Self {
        Self {
            modules,
            submodules,
            programs,
        }
    }

    #[must_use]
    pub fn modules(&self) -> &BTreeMap<String, Module> {
        &self.modules
    }

    #[must_use]
    pub fn submodules(&self) -> &BTreeMap<String, Submodule> {
        &self.submodules
    }

    #[must_use]
    pub fn programs(&self) -> &BTreeMap<String, Program> {
        &self.programs
    }

    /// Case-insensitive module lookup
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(&symbol_key(name))
    }

    #[must_use]
    pub fn submodule(&self, name: &str) -> Option<&Submodule> {
        self.submodules.get(&symbol_key(name))
    }

    #[must_use]
    pub fn program(&self, name: &str) -> Option<&Program> {
        self.programs.get(&symbol_key(name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.submodules.is_empty() && self.programs.is_empty()
    }

    /// Rewrite every doc string, consuming the result
    #[must_use]
    pub fn map_docs(mut self, f: impl Fn(&str) -> String) -> Self {
        let f = &f;
        for module in self.modules.values_mut() {
            map_doc(&mut module.doc, f);
            map_procedures(&mut module.procedures, f);
            map_procedures(&mut module.interfaces, f);
            map_types(&mut module.types, f);
            map_generics(&mut module.generics, f);
        }
        for submodule in self.submodules.values_mut() {
            map_doc(&mut submodule.doc, f);
            map_procedures(&mut submodule.procedures, f);
            map_procedures(&mut submodule.interfaces, f);
            map_types(&mut submodule.types, f);
            map_generics(&mut submodule.generics, f);
        }
        for program in self.programs.values_mut() {
            map_doc(&mut program.doc, f);
            map_procedures(&mut program.procedures, f);
        }
        self
    }
}

fn map_doc(doc: &mut Option<String>, f: &dyn Fn(&str) -> String) {
    if let Some(text) = doc {
        *text = f(text);
    }
}

fn map_procedures(procedures: &mut [Procedure], f: &dyn Fn(&str) -> String) {
    for procedure in procedures {
        map_doc(&mut procedure.doc, f);
        for arg in procedure.arguments.iter_mut().chain(procedure.result.as_mut()) {
            map_doc(&mut arg.doc, f);
        }
    }
}

fn map_types(types: &mut [DerivedType], f: &dyn Fn(&str) -> String) {
    for ty in types {
        map_doc(&mut ty.doc, f);
        for component in &mut ty.components {
            map_doc(&mut component.doc, f);
        }
        for binding in &mut ty.type_bound_procedures {
            map_doc(&mut binding.doc, f);
        }
    }
}

fn map_generics(generics: &mut [GenericInterface], f: &dyn Fn(&str) -> String) {
    for generic in generics {
        map_doc(&mut generic.doc, f);
    }
}

/// Mapping key for a Fortran identifier
#[must_use]
pub fn symbol_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
