//! Open/close pairing of symbols.
//!
//! Pairs are back-references by id (`belongs_to` / `is_closed_by`); no
//! symbol owns another.

use super::symbol::{Symbol, SymbolId};
use super::table::SymbolTable;
use super::SyntaxIssueKind;

/// Whether a construct needs a closing counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CloseRequirement {
    /// Must be closed; an unmatched opener is reported.
    Required,
    /// May be closed (variables used as loops, pair-or-single tags).
    #[default]
    Optional,
    /// Never pairs; not considered when matching closers.
    Never,
}

/// Match closers to their nearest open counterpart.
///
/// A closer `{{ /name }}` matches the nearest pending opener whose adjusted
/// name or tag name equals `name`. Openers left pending inside a matched pair
/// are dropped from the stack. Unmatched closers and required-but-unclosed
/// openers are recorded as issues on the table; pairing always runs to the end
/// of the document.
pub fn pair_symbols(table: &mut SymbolTable, requirement: impl Fn(&Symbol) -> CloseRequirement) {
    let mut pending: Vec<(SymbolId, CloseRequirement)> = Vec::new();
    let mut matches: Vec<(SymbolId, SymbolId)> = Vec::new();
    let mut unmatched_closers: Vec<SymbolId> = Vec::new();
    let mut unclosed: Vec<SymbolId> = Vec::new();

    for symbol in table.iter() {
        if symbol.is_interpolation || symbol.is_comment {
            continue;
        }
        if symbol.is_closing_tag {
            let position = pending.iter().rposition(|(id, _)| {
                table
                    .get(*id)
                    .is_some_and(|opener| closes(symbol, opener))
            });
            match position {
                Some(position) => {
                    let (opener, _) = pending[position];
                    for (skipped, req) in pending.drain(position + 1..) {
                        if req == CloseRequirement::Required {
                            unclosed.push(skipped);
                        }
                    }
                    pending.pop();
                    matches.push((opener, symbol.id));
                }
                None => unmatched_closers.push(symbol.id),
            }
            continue;
        }
        if !symbol.can_open() {
            continue;
        }
        let req = requirement(symbol);
        if req != CloseRequirement::Never {
            pending.push((symbol.id, req));
        }
    }

    unclosed.extend(
        pending
            .into_iter()
            .filter(|(_, req)| *req == CloseRequirement::Required)
            .map(|(id, _)| id),
    );

    for (opener, closer) in matches {
        let runtime_name = table.get(opener).map(|s| s.runtime_name.clone());
        if let Some(open) = table.get_mut(opener) {
            open.is_closed_by = Some(closer);
        }
        if let Some(close) = table.get_mut(closer) {
            close.belongs_to = Some(opener);
            if let Some(name) = runtime_name {
                close.runtime_name = name;
            }
        }
    }

    for closer in unmatched_closers {
        let name = table
            .get(closer)
            .map(|s| s.adjusted_name.clone())
            .unwrap_or_default();
        table.report(
            SyntaxIssueKind::UnmatchedClose,
            closer,
            format!("closing tag '/{name}' has no matching opening tag"),
        );
    }
    for opener in unclosed {
        let name = table
            .get(opener)
            .map(|s| s.adjusted_name.clone())
            .unwrap_or_default();
        table.report(
            SyntaxIssueKind::Unclosed,
            opener,
            format!("tag '{name}' is never closed"),
        );
    }
}

fn closes(closer: &Symbol, opener: &Symbol) -> bool {
    closer.adjusted_name == opener.adjusted_name || closer.adjusted_name == opener.tag_name
}
