//! Per-file symbol extraction.
//!
//! A file is scanned once, split into statements and resolved into a block
//! tree. Every recognized entity then gets its documentation from the lines
//! around its own declaring statement:
//!
//! - the doc block directly above the statement (predoc)
//! - for program units, the doc block directly below the statement unless it
//!   belongs to a declaration that follows
//! - for procedures without a predoc, the doc block directly below the
//!   signature unless it belongs to an argument declaration
//! - inline fragments, which go to the nearest preceding argument, result or
//!   declared name on their physical line

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, trace};

use crate::doc::extract::{doc_block_below, doc_in_comment, extract_postdoc, extract_predoc};
use crate::error::Result;
use crate::model::{
    symbol_key, Argument, Component, DerivedType, GenericInterface, Module, Procedure, Program,
    SourceLocation, Submodule, TypeBoundProcedure,
};
use crate::parser::recognize::{
    match_bindings, match_declaration, match_generic_members, match_opener, match_use,
    nearest_identifier, Declaration, Opener, SubmoduleHeader,
};
use crate::parser::scanner::read_lines;
use crate::parser::{statements, Segment, Statement};
use crate::scope::{resolve_spans, Block, ScopeKind};

/// Program units found in one file, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSymbols {
    pub modules: Vec<Module>,
    pub submodules: Vec<Submodule>,
    pub programs: Vec<Program>,
}

/// Read and extract one file
pub fn extract_file(path: &Path, markers: &[String]) -> Result<FileSymbols> {
    let lines = read_lines(path)?;
    let symbols = extract_source(&path.to_string_lossy(), &lines, markers);
    debug!(
        path = %path.display(),
        lines = lines.len(),
        modules = symbols.modules.len(),
        submodules = symbols.submodules.len(),
        programs = symbols.programs.len(),
        "parsed file"
    );
    Ok(symbols)
}

/// Extract the program units of already-read source lines
///
/// `path` is only used for the recorded locations.
#[must_use]
pub fn extract_source(path: &str, lines: &[String], markers: &[String]) -> FileSymbols {
    let statements = statements(lines);
    let blocks = resolve_spans(&statements);
    let file = SourceFile {
        path,
        lines,
        markers,
        statements: &statements,
    };

    let mut symbols = FileSymbols::default();
    for block in &blocks {
        match &block.opener {
            Opener::Module(name) => symbols.modules.push(file.module(block, name)),
            Opener::Submodule(header) => symbols.submodules.push(file.submodule(block, header)),
            Opener::Program(name) => symbols.programs.push(file.program(block, name)),
            other => trace!(
                kind = %other.kind(),
                line = file.stmt(block.header).start + 1,
                "ignoring construct outside a program unit"
            ),
        }
    }
    symbols
}

struct SourceFile<'a> {
    path: &'a str,
    lines: &'a [String],
    markers: &'a [String],
    statements: &'a [Statement],
}

impl SourceFile<'_> {
    fn stmt(&self, idx: usize) -> &Statement {
        &self.statements[idx]
    }

    fn location(&self, idx: usize) -> SourceLocation {
        SourceLocation::new(self.path, self.stmt(idx).start + 1)
    }

    fn predoc(&self, idx: usize) -> Option<String> {
        extract_predoc(self.lines, self.stmt(idx).start, self.markers)
    }

    /// Statement that starts on a physical line
    fn statement_at_line(&self, line: usize) -> Option<&Statement> {
        self.statements
            .binary_search_by_key(&line, |s| s.start)
            .ok()
            .map(|idx| &self.statements[idx])
    }

    /// Doc block below statement `idx`, with the statement that follows it
    fn doc_below(&self, idx: usize) -> Option<(String, Option<&Statement>)> {
        let end = self.stmt(idx).end;
        let block = doc_block_below(self.lines, end, self.markers);
        if block.is_empty() {
            return None;
        }
        let text = extract_postdoc(self.lines, end, self.markers)?;
        Some((text, self.statement_at_line(block.end)))
    }

    /// Header doc of a program unit
    fn header_doc(&self, idx: usize) -> Option<String> {
        let (text, next) = self.doc_below(idx)?;
        if next.is_some_and(|s| is_documentable(&s.code)) {
            return None;
        }
        Some(text)
    }

    fn unit_doc(&self, idx: usize) -> Option<String> {
        join_docs(self.predoc(idx), self.header_doc(idx))
    }

    /// Inline doc fragments of a statement, per physical line
    ///
    /// Reads segment comments, so a `!>` inside a string literal that spans
    /// a continuation is not taken for a marker.
    fn inline_docs(&self, idx: usize) -> Vec<(&Segment, String)> {
        self.stmt(idx)
            .segments
            .iter()
            .filter_map(|seg| {
                let (_, text) = doc_in_comment(seg.comment.as_deref()?, self.markers)?;
                Some((seg, text))
            })
            .collect()
    }

    fn module(&self, block: &Block, name: &str) -> Module {
        trace!(module = name, "recognized module");
        Module {
            name: name.to_string(),
            doc: self.unit_doc(block.header),
            procedures: self.procedures(block),
            types: self.types(block),
            interfaces: self.interfaces(block),
            generics: self.generics(block),
            location: Some(self.location(block.header)),
        }
    }

    fn submodule(&self, block: &Block, header: &SubmoduleHeader) -> Submodule {
        trace!(submodule = %header.name, parent = %header.parent_module, "recognized submodule");
        Submodule {
            name: header.name.clone(),
            parent_module: header.parent_module.clone(),
            doc: self.unit_doc(block.header),
            procedures: self.procedures(block),
            types: self.types(block),
            interfaces: self.interfaces(block),
            generics: self.generics(block),
            location: Some(self.location(block.header)),
        }
    }

    fn program(&self, block: &Block, name: &str) -> Program {
        trace!(program = name, "recognized program");
        let dependencies: BTreeSet<String> = block
            .specification_part()
            .filter_map(|idx| match_use(&self.stmt(idx).code))
            .map(|dep| symbol_key(&dep))
            .collect();

        let first = self.stmt(block.header).start;
        let last = block
            .end
            .map_or(self.lines.len().saturating_sub(1), |idx| self.stmt(idx).end);
        let source = self.lines[first..=last.max(first)].join("\n");

        Program {
            name: name.to_string(),
            doc: self.unit_doc(block.header),
            dependencies,
            procedures: self.procedures(block),
            source: Some(source),
            location: Some(self.location(block.header)),
        }
    }

    fn procedures(&self, block: &Block) -> Vec<Procedure> {
        block
            .procedures()
            .filter_map(|child| self.procedure(child))
            .collect()
    }

    fn types(&self, block: &Block) -> Vec<DerivedType> {
        block
            .children_of(ScopeKind::Type)
            .filter_map(|child| self.derived_type(child))
            .collect()
    }

    /// Signatures of the interface blocks directly inside `block`
    ///
    /// A lone signature without its own doc takes the interface block's doc.
    fn interfaces(&self, block: &Block) -> Vec<Procedure> {
        let mut signatures = Vec::new();
        for iface in block.children_of(ScopeKind::Interface) {
            let bodies: Vec<&Block> = iface.procedures().collect();
            let single = bodies.len() == 1;
            for body in bodies {
                let Some(mut procedure) = self.procedure(body) else {
                    continue;
                };
                if procedure.doc.is_none() && single {
                    procedure.doc = self.predoc(iface.header);
                }
                signatures.push(procedure);
            }
        }
        signatures
    }

    /// Named interface blocks directly inside `block`
    ///
    /// Members are the names listed by `module procedure` statements followed
    /// by the signatures written in the block.
    fn generics(&self, block: &Block) -> Vec<GenericInterface> {
        block
            .children_of(ScopeKind::Interface)
            .filter_map(|iface| {
                let Opener::Interface(header) = &iface.opener else {
                    return None;
                };
                let name = header.name.clone()?;
                let mut procedures: Vec<String> = iface
                    .body
                    .iter()
                    .flat_map(|&idx| match_generic_members(&self.stmt(idx).code))
                    .collect();
                procedures.extend(iface.procedures().filter_map(|body| match &body.opener {
                    Opener::Procedure(h) => Some(h.name.clone()),
                    _ => None,
                }));
                trace!(generic = %name, members = procedures.len(), "recognized generic interface");
                Some(GenericInterface {
                    name,
                    doc: self.predoc(iface.header),
                    procedures,
                    location: Some(self.location(iface.header)),
                })
            })
            .collect()
    }

    fn procedure(&self, block: &Block) -> Option<Procedure> {
        let Opener::Procedure(header) = &block.opener else {
            return None;
        };

        let result_name = header.result_name();
        let mut arguments: Vec<Argument> = header
            .args
            .iter()
            .filter(|a| !result_name.is_some_and(|r| a.eq_ignore_ascii_case(r)))
            .map(Argument::named)
            .collect();
        let mut result = result_name.map(Argument::named);

        let mut interest: Vec<String> = arguments.iter().map(|a| a.name.clone()).collect();
        interest.extend(result_name.map(str::to_string));

        for (seg, text) in self.inline_docs(block.header) {
            if let Some(name) = nearest_identifier(&seg.code, &interest) {
                if let Some(arg) = argument_mut(&mut arguments, &mut result, name) {
                    append_doc(&mut arg.doc, &text);
                }
            }
        }

        for idx in block.specification_part() {
            let Some(decl) = match_declaration(&self.stmt(idx).code) else {
                continue;
            };
            let declared = declared_names(&decl, &interest);
            if declared.is_empty() {
                continue;
            }

            let predoc = self.predoc(idx);
            for entity in decl.names.iter().filter(|n| contains_name(&interest, &n.name)) {
                let Some(arg) = argument_mut(&mut arguments, &mut result, &entity.name) else {
                    continue;
                };
                if arg.decl.is_none() {
                    arg.decl = Some(decl.decl_for(entity));
                    arg.intent = decl.intent;
                    arg.location = Some(self.location(idx));
                }
                if let Some(doc) = &predoc {
                    append_doc(&mut arg.doc, doc);
                }
            }

            for (seg, text) in self.inline_docs(idx) {
                if let Some(name) = nearest_identifier(entity_list(&seg.code), &declared) {
                    if let Some(arg) = argument_mut(&mut arguments, &mut result, name) {
                        append_doc(&mut arg.doc, &text);
                    }
                }
            }
        }

        let doc = self
            .predoc(block.header)
            .or_else(|| self.procedure_postdoc(block.header, &interest));

        Some(Procedure {
            name: header.name.clone(),
            kind: header.kind,
            arguments,
            result,
            signature: Some(header.signature.clone()),
            doc,
            location: Some(self.location(block.header)),
        })
    }

    /// Doc below a signature, unless it documents an argument declaration
    fn procedure_postdoc(&self, header: usize, interest: &[String]) -> Option<String> {
        let (text, next) = self.doc_below(header)?;
        let documents_argument = next
            .and_then(|s| match_declaration(&s.code))
            .is_some_and(|decl| !declared_names(&decl, interest).is_empty());
        (!documents_argument).then_some(text)
    }

    fn derived_type(&self, block: &Block) -> Option<DerivedType> {
        let Opener::Type(header) = &block.opener else {
            return None;
        };

        let mut components = Vec::new();
        for idx in block.specification_part() {
            let Some(decl) = match_declaration(&self.stmt(idx).code) else {
                continue;
            };
            let names: Vec<String> = decl.names.iter().map(|n| n.name.clone()).collect();
            let predoc = self.predoc(idx);
            let mut docs: Vec<Option<String>> = vec![predoc; names.len()];
            for (seg, text) in self.inline_docs(idx) {
                if let Some(pos) = nearest_position(entity_list(&seg.code), &names) {
                    append_doc(&mut docs[pos], &text);
                }
            }
            for (entity, doc) in decl.names.iter().zip(docs) {
                components.push(Component {
                    name: entity.name.clone(),
                    doc,
                    decl: Some(decl.decl_for(entity)),
                    location: Some(self.location(idx)),
                });
            }
        }

        let mut type_bound_procedures = Vec::new();
        for idx in block.subprogram_part() {
            let bindings = match_bindings(&self.stmt(idx).code);
            if bindings.is_empty() {
                continue;
            }
            let names: Vec<String> = bindings.iter().map(|b| b.name.clone()).collect();
            let mut docs: Vec<Option<String>> = vec![self.predoc(idx); names.len()];
            for (seg, text) in self.inline_docs(idx) {
                if let Some(pos) = nearest_position(entity_list(&seg.code), &names) {
                    append_doc(&mut docs[pos], &text);
                }
            }
            for (binding, doc) in bindings.into_iter().zip(docs) {
                type_bound_procedures.push(TypeBoundProcedure {
                    name: binding.name,
                    target: binding.target,
                    doc,
                    location: Some(self.location(idx)),
                });
            }
        }

        Some(DerivedType {
            name: header.name.clone(),
            doc: self.predoc(block.header),
            extends: header.extends.clone(),
            components,
            type_bound_procedures,
            location: Some(self.location(block.header)),
        })
    }
}

/// Whether a doc block right above this statement belongs to it
fn is_documentable(code: &str) -> bool {
    match_opener(code).is_some()
        || match_declaration(code).is_some()
        || !match_bindings(code).is_empty()
}

fn contains_name(names: &[String], name: &str) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(name))
}

/// Names declared by `decl` that are also in `interest`
fn declared_names(decl: &Declaration, interest: &[String]) -> Vec<String> {
    decl.names
        .iter()
        .filter(|n| contains_name(interest, &n.name))
        .map(|n| n.name.clone())
        .collect()
}

/// Part of a declaration line that lists entities (after `::` when present)
fn entity_list(code: &str) -> &str {
    code.find("::").map_or(code, |pos| &code[pos + 2..])
}

fn nearest_position(code: &str, names: &[String]) -> Option<usize> {
    let name = nearest_identifier(code, names)?;
    names.iter().position(|n| n == name)
}

fn argument_mut<'a>(
    arguments: &'a mut [Argument],
    result: &'a mut Option<Argument>,
    name: &str,
) -> Option<&'a mut Argument> {
    if let Some(arg) = arguments
        .iter_mut()
        .find(|a| a.name.eq_ignore_ascii_case(name))
    {
        return Some(arg);
    }
    result
        .as_mut()
        .filter(|r| r.name.eq_ignore_ascii_case(name))
}

fn append_doc(slot: &mut Option<String>, text: &str) {
    if text.is_empty() {
        return;
    }
    match slot {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(text);
        }
        None => *slot = Some(text.to_string()),
    }
}

fn join_docs(first: Option<String>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{a}\n{b}")),
        (a, b) => a.or(b),
    }
}
