/// Scope kinds for the Fortran constructs that carry symbols
use std::fmt;

use crate::model::ProcedureKind;

/// Fortran block kinds tracked by the span resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    // Program units
    Module,
    Submodule,
    Program,

    // Subprograms
    Subroutine,
    Function,
    /// `module procedure name` body in a (sub)module
    SeparateProcedure,

    Interface,
    Type,
}

impl ScopeKind {
    /// Parse the keyword that follows `end`
    #[must_use]
    pub fn from_end_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "module" => Some(ScopeKind::Module),
            "submodule" => Some(ScopeKind::Submodule),
            "program" => Some(ScopeKind::Program),
            "subroutine" => Some(ScopeKind::Subroutine),
            "function" => Some(ScopeKind::Function),
            "procedure" => Some(ScopeKind::SeparateProcedure),
            "interface" => Some(ScopeKind::Interface),
            "type" => Some(ScopeKind::Type),
            _ => None,
        }
    }

    /// Check if this is a program unit (module, submodule or program)
    #[must_use]
    pub fn is_program_unit(self) -> bool {
        matches!(
            self,
            ScopeKind::Module | ScopeKind::Submodule | ScopeKind::Program
        )
    }

    /// Procedure kind for function/subroutine scopes
    #[must_use]
    pub fn procedure_kind(self) -> Option<ProcedureKind> {
        match self {
            ScopeKind::Function => Some(ProcedureKind::Function),
            ScopeKind::Subroutine => Some(ProcedureKind::Subroutine),
            _ => None,
        }
    }

    /// Whether a block of kind `self` may open directly inside `parent`
    ///
    /// `None` is the file's top level.
    #[must_use]
    pub fn can_open_in(self, parent: Option<ScopeKind>) -> bool {
        match self {
            ScopeKind::Module | ScopeKind::Submodule | ScopeKind::Program => parent.is_none(),
            ScopeKind::Subroutine | ScopeKind::Function => parent != Some(ScopeKind::Type),
            ScopeKind::SeparateProcedure => {
                matches!(parent, Some(ScopeKind::Module | ScopeKind::Submodule))
            }
            ScopeKind::Interface | ScopeKind::Type => parent.is_some_and(|p| {
                p.is_program_unit()
                    || matches!(
                        p,
                        ScopeKind::Subroutine | ScopeKind::Function | ScopeKind::SeparateProcedure
                    )
            }),
        }
    }
}

impl From<ProcedureKind> for ScopeKind {
    fn from(kind: ProcedureKind) -> Self {
        match kind {
            ProcedureKind::Function => ScopeKind::Function,
            ProcedureKind::Subroutine => ScopeKind::Subroutine,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::Module => "MODULE",
            ScopeKind::Submodule => "SUBMODULE",
            ScopeKind::Program => "PROGRAM",
            ScopeKind::Subroutine => "SUBROUTINE",
            ScopeKind::Function => "FUNCTION",
            ScopeKind::SeparateProcedure => "MODULE PROCEDURE",
            ScopeKind::Interface => "INTERFACE",
            ScopeKind::Type => "TYPE",
        };
        write!(f, "{name}")
    }
}
