/// Span resolver - pairs opening statements with their `end` statements
///
/// Statements are walked once with a stack of open blocks. Each block keeps
/// the statements that belong to it directly, so a nested construct never
/// shows up in the body of its parent.
use tracing::trace;

use super::types::ScopeKind;
use crate::parser::recognize::{is_contains, match_end, match_opener, Opener};
use crate::parser::Statement;

/// A resolved block of statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub opener: Opener,
    /// Statement index of the opening statement
    pub header: usize,
    /// Statement index of the matching end; `None` when closed implicitly
    pub end: Option<usize>,
    /// Statement index of this block's own `contains`
    pub contains: Option<usize>,
    pub children: Vec<Block>,
    /// Statement indices owned directly by this block, in order
    pub body: Vec<usize>,
}

impl Block {
    fn open(opener: Opener, header: usize) -> Self {
        Self {
            opener,
            header,
            end: None,
            contains: None,
            children: Vec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        self.opener.kind()
    }

    /// Body statements before `contains` (all of them if there is none)
    pub fn specification_part(&self) -> impl Iterator<Item = usize> + '_ {
        let limit = self.contains.unwrap_or(usize::MAX);
        self.body.iter().copied().filter(move |&idx| idx < limit)
    }

    /// Body statements after `contains`
    pub fn subprogram_part(&self) -> impl Iterator<Item = usize> + '_ {
        let contains = self.contains;
        self.body
            .iter()
            .copied()
            .filter(move |&idx| contains.is_some_and(|c| idx > c))
    }

    /// Direct children of the given kind
    pub fn children_of(&self, kind: ScopeKind) -> impl Iterator<Item = &Block> + '_ {
        self.children.iter().filter(move |b| b.kind() == kind)
    }

    /// Direct function and subroutine children
    pub fn procedures(&self) -> impl Iterator<Item = &Block> + '_ {
        self.children
            .iter()
            .filter(|b| b.kind().procedure_kind().is_some())
    }
}

/// Resolve the block tree of a file
#[must_use]
pub fn resolve_spans(statements: &[Statement]) -> Vec<Block> {
    let mut roots: Vec<Block> = Vec::new();
    let mut stack: Vec<Block> = Vec::new();

    for (idx, stmt) in statements.iter().enumerate() {
        let code = stmt.code.as_str();

        if let Some(end) = match_end(code) {
            let target = match end.kind {
                None => stack.len().checked_sub(1),
                Some(kind) => stack.iter().rposition(|b| b.kind() == kind),
            };
            if let Some(pos) = target {
                // Anything opened above the target is closed implicitly
                while stack.len() > pos + 1 {
                    close(&mut stack, &mut roots, None);
                }
                close(&mut stack, &mut roots, Some(idx));
                continue;
            }
            trace!(line = stmt.start + 1, "unmatched end statement");
        }

        if is_contains(code) {
            if let Some(top) = stack.last_mut() {
                if top.contains.is_none() {
                    top.contains = Some(idx);
                    continue;
                }
            }
        }

        if let Some(opener) = match_opener(code) {
            let parent = stack.last().map(Block::kind);
            if opener.kind().can_open_in(parent) {
                stack.push(Block::open(opener, idx));
                continue;
            }
        }

        if let Some(top) = stack.last_mut() {
            top.body.push(idx);
        }
    }

    // Unclosed blocks end at EOF
    while !stack.is_empty() {
        close(&mut stack, &mut roots, None);
    }

    roots
}

fn close(stack: &mut Vec<Block>, roots: &mut Vec<Block>, end: Option<usize>) {
    let Some(mut block) = stack.pop() else {
        return;
    };
    block.end = end;
    match stack.last_mut() {
        Some(parent) => parent.children.push(block),
        None => roots.push(block),
    }
}
