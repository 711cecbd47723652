//! Statement recognizers.
//!
//! Each recognizer takes the comment-free code of one logical statement and
//! returns a typed description of the construct, or `None` when the statement
//! is something else. Statements that are not recognized are never errors.

use crate::model::{Intent, ProcedureKind};
use crate::scope::ScopeKind;

use super::char_filter::CharFilter;
use super::patterns::{
    BINDING_ITEM_RE, BINDING_RE, BINDING_SHORT_RE, CONTAINS_RE, DECL_START_RE, DIMENSION_RE,
    END_ANY_RE, END_KIND_RE, ENTITY_RE, EXTENDS_RE, GENERIC_MEMBERS_RE, IDENT_RE, INTENT_RE,
    INTERFACE_RE, MODULE_RE, PROCEDURE_RE, PROC_SUFFIX_RE, PROGRAM_RE, RESULT_RE, SEPARATE_PROC_RE, SUBMODULE_RE,
    TYPE_DEF_RE, TYPE_LEGACY_RE, USE_RE,
};

/// `function`/`subroutine` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureHeader {
    pub kind: ProcedureKind,
    pub name: String,
    /// Dummy arguments in signature order (`*` alternate returns dropped)
    pub args: Vec<String>,
    /// Name from the `result(...)` clause
    pub result: Option<String>,
    /// Display form of the whole header, see [`display_signature`]
    pub signature: String,
}

impl ProcedureHeader {
    /// Result variable name: the `result(...)` name, or the function name
    #[must_use]
    pub fn result_name(&self) -> Option<&str> {
        match self.kind {
            ProcedureKind::Function => Some(self.result.as_deref().unwrap_or(&self.name)),
            ProcedureKind::Subroutine => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleHeader {
    pub name: String,
    /// Ancestor module
    pub parent_module: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    pub name: String,
    pub extends: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceHeader {
    /// Generic name or operator spec; `None` for plain and abstract blocks
    pub name: Option<String>,
}

/// `end`, with the keyword that follows it if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndStatement {
    /// `None` for a bare `end`
    pub kind: Option<ScopeKind>,
    pub name: Option<String>,
}

/// One entity of a type declaration statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredName {
    pub name: String,
    /// Array spec written on the entity, e.g. `n, m` for `a(n, m)`
    pub dims: Option<String>,
}

/// A type declaration statement (`<type-spec>[, attrs] :: names`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Everything before `::`, whitespace preserved but trimmed
    pub spec: String,
    pub intent: Intent,
    pub names: Vec<DeclaredName>,
}

impl Declaration {
    /// Declaration text for one entity
    ///
    /// Array bounds written on the entity itself are appended as a
    /// `dimension(...)` attribute unless the spec already has one.
    #[must_use]
    pub fn decl_for(&self, entity: &DeclaredName) -> String {
        match &entity.dims {
            Some(dims) if !DIMENSION_RE.is_match(&self.spec) => {
                format!("{}, dimension({dims})", self.spec)
            }
            _ => self.spec.clone(),
        }
    }

    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.name.eq_ignore_ascii_case(name))
    }
}

/// A type-bound procedure binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    /// `None` for deferred bindings
    pub target: Option<String>,
}

/// Opening statement of a tracked block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opener {
    Module(String),
    Submodule(SubmoduleHeader),
    Program(String),
    Procedure(ProcedureHeader),
    SeparateProcedure(String),
    Interface(InterfaceHeader),
    Type(TypeHeader),
}

impl Opener {
    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        match self {
            Opener::Module(_) => ScopeKind::Module,
            Opener::Submodule(_) => ScopeKind::Submodule,
            Opener::Program(_) => ScopeKind::Program,
            Opener::Procedure(h) => h.kind.into(),
            Opener::SeparateProcedure(_) => ScopeKind::SeparateProcedure,
            Opener::Interface(_) => ScopeKind::Interface,
            Opener::Type(_) => ScopeKind::Type,
        }
    }
}

/// Try every block opener on a statement
#[must_use]
pub fn match_opener(code: &str) -> Option<Opener> {
    if let Some(name) = match_module(code) {
        return Some(Opener::Module(name));
    }
    if let Some(header) = match_submodule(code) {
        return Some(Opener::Submodule(header));
    }
    if let Some(name) = match_program(code) {
        return Some(Opener::Program(name));
    }
    if let Some(name) = match_separate_procedure(code) {
        return Some(Opener::SeparateProcedure(name));
    }
    if let Some(header) = match_procedure(code) {
        return Some(Opener::Procedure(header));
    }
    if let Some(header) = match_interface(code) {
        return Some(Opener::Interface(header));
    }
    match_type_def(code).map(Opener::Type)
}

#[must_use]
pub fn match_module(code: &str) -> Option<String> {
    let caps = MODULE_RE.captures(code)?;
    let name = &caps[1];
    if matches!(
        name.to_ascii_lowercase().as_str(),
        "procedure" | "subroutine" | "function"
    ) {
        return None;
    }
    Some(name.to_string())
}

#[must_use]
pub fn match_submodule(code: &str) -> Option<SubmoduleHeader> {
    let caps = SUBMODULE_RE.captures(code)?;
    Some(SubmoduleHeader {
        name: caps[3].to_string(),
        parent_module: caps[1].to_string(),
    })
}

#[must_use]
pub fn match_program(code: &str) -> Option<String> {
    PROGRAM_RE.captures(code).map(|caps| caps[1].to_string())
}

#[must_use]
pub fn match_separate_procedure(code: &str) -> Option<String> {
    SEPARATE_PROC_RE
        .captures(code)
        .map(|caps| caps[1].to_string())
}

#[must_use]
pub fn match_procedure(code: &str) -> Option<ProcedureHeader> {
    let caps = PROCEDURE_RE.captures(code)?;
    let suffix = caps.get(4).map_or("", |m| m.as_str());
    if !PROC_SUFFIX_RE.is_match(suffix) {
        return None;
    }

    let kind = if caps[1].eq_ignore_ascii_case("function") {
        ProcedureKind::Function
    } else {
        ProcedureKind::Subroutine
    };
    let args = caps
        .get(3)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty() && *a != "*")
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let result = RESULT_RE.captures(suffix).map(|r| r[1].to_string());

    Some(ProcedureHeader {
        kind,
        name: caps[2].to_string(),
        args,
        result,
        signature: display_signature(code),
    })
}

/// Header text as shown in rendered docs
///
/// Whitespace runs collapse to one space and a `result(name)` clause is
/// replaced by a trailing `-> name`, e.g. `pure function foo(a) -> res`.
#[must_use]
pub fn display_signature(code: &str) -> String {
    let collapsed = collapse_whitespace(code);
    let Some(result) = RESULT_RE.captures(&collapsed).map(|caps| caps[1].to_string()) else {
        return collapsed;
    };
    let without = RESULT_RE.replace_all(&collapsed, "");
    format!("{} -> {result}", collapse_whitespace(&without))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[must_use]
pub fn match_type_def(code: &str) -> Option<TypeHeader> {
    if let Some(caps) = TYPE_DEF_RE.captures(code) {
        let extends = caps
            .get(1)
            .and_then(|attrs| EXTENDS_RE.captures(attrs.as_str()))
            .map(|e| e[1].to_string());
        return Some(TypeHeader {
            name: caps[2].to_string(),
            extends,
        });
    }
    let caps = TYPE_LEGACY_RE.captures(code)?;
    if caps[1].eq_ignore_ascii_case("is") {
        return None;
    }
    Some(TypeHeader {
        name: caps[1].to_string(),
        extends: None,
    })
}

#[must_use]
pub fn match_interface(code: &str) -> Option<InterfaceHeader> {
    let caps = INTERFACE_RE.captures(code)?;
    Some(InterfaceHeader {
        name: caps.get(1).map(|m| collapse_whitespace(m.as_str())),
    })
}

/// Procedures named by a `[module] procedure [::] a, b` statement
///
/// Used on the body of a generic interface block.
#[must_use]
pub fn match_generic_members(code: &str) -> Vec<String> {
    GENERIC_MEMBERS_RE
        .captures(code)
        .map(|caps| {
            caps[1]
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[must_use]
pub fn match_end(code: &str) -> Option<EndStatement> {
    if END_ANY_RE.is_match(code) {
        return Some(EndStatement {
            kind: None,
            name: None,
        });
    }
    let caps = END_KIND_RE.captures(code)?;
    Some(EndStatement {
        kind: ScopeKind::from_end_keyword(&caps[1]),
        name: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

#[must_use]
pub fn is_contains(code: &str) -> bool {
    CONTAINS_RE.is_match(code)
}

/// Module named by a `use` statement
#[must_use]
pub fn match_use(code: &str) -> Option<String> {
    USE_RE.captures(code).map(|caps| caps[1].to_string())
}

#[must_use]
pub fn match_declaration(code: &str) -> Option<Declaration> {
    if !DECL_START_RE.is_match(code) {
        return None;
    }
    let split = find_double_colon(code)?;
    let spec = code[..split].trim().to_string();
    let intent = INTENT_RE
        .captures(&spec)
        .map_or(Intent::None, |caps| Intent::from_spec(&caps[1]));

    let names: Vec<DeclaredName> = split_top_level(&code[split + 2..])
        .into_iter()
        .filter_map(|entity| {
            let caps = ENTITY_RE.captures(entity)?;
            Some(DeclaredName {
                name: caps[1].to_string(),
                dims: caps.get(2).map(|m| m.as_str().trim().to_string()),
            })
        })
        .collect();
    if names.is_empty() {
        return None;
    }

    Some(Declaration {
        spec,
        intent,
        names,
    })
}

/// Bindings of a `procedure` statement in a type's `contains` section
#[must_use]
pub fn match_bindings(code: &str) -> Vec<Binding> {
    if let Some(caps) = BINDING_RE.captures(code) {
        let deferred = caps
            .get(2)
            .is_some_and(|attrs| attrs.as_str().to_ascii_lowercase().contains("deferred"));
        return split_top_level(&caps[3])
            .into_iter()
            .filter_map(|item| {
                let item_caps = BINDING_ITEM_RE.captures(item)?;
                let name = item_caps[1].to_string();
                let target = if deferred {
                    None
                } else {
                    Some(
                        item_caps
                            .get(2)
                            .map_or_else(|| name.clone(), |t| t.as_str().to_string()),
                    )
                };
                Some(Binding { name, target })
            })
            .collect();
    }
    BINDING_SHORT_RE
        .captures(code)
        .map(|caps| {
            vec![Binding {
                name: caps[1].to_string(),
                target: Some(caps[1].to_string()),
            }]
        })
        .unwrap_or_default()
}

/// Last identifier in `code` that is one of `candidates`
///
/// String literals are ignored. Matching is case-insensitive; the candidate's
/// own spelling is returned.
#[must_use]
pub fn nearest_identifier<'c>(code: &str, candidates: &'c [String]) -> Option<&'c str> {
    let code_only = CharFilter::new(code, true, true).filter_all();
    IDENT_RE
        .find_iter(&code_only)
        .filter_map(|m| {
            candidates
                .iter()
                .find(|c| c.eq_ignore_ascii_case(m.as_str()))
        })
        .last()
        .map(String::as_str)
}

/// Byte offset of the first `::` outside parentheses
fn find_double_colon(code: &str) -> Option<usize> {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    for (pos, c) in CharFilter::new(code, true, true) {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 && bytes.get(pos + 1) == Some(&b':') => return Some(pos),
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested in parentheses or brackets
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (pos, c) in CharFilter::new(text, false, true) {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..pos].trim());
                start = pos + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}
