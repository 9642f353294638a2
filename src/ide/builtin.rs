//! Handlers the engine ships with.
//!
//! They are registered like any other handler, so hosts can clear or precede
//! them through the registry.

use crate::hir::{Diagnostic, HookError, check_symbol};

use super::completion::{CompletionItem, CompletionResponse};
use super::diagnostics::SymbolRequest;
use super::hover::HoverResult;
use super::registry::{CapabilityRegistry, CompletionCategory, HoverCategory};
use super::request::SuggestionRequest;

/// Install the built-in completion, hover and diagnostics handlers.
pub fn register_defaults(registry: &mut CapabilityRegistry) {
    registry.add_completion_handler(CompletionCategory::Modifier, modifier_completions);
    registry.add_completion_handler(CompletionCategory::Parameter, parameter_completions);
    registry.add_completion_handler(CompletionCategory::Tag, tag_completions);
    registry.add_completion_handler(CompletionCategory::General, variable_completions);

    registry.add_hover_handler(HoverCategory::Modifier, modifier_hover);
    registry.add_hover_handler(HoverCategory::Tag, tag_hover);
    registry.add_hover_handler(HoverCategory::ScopeVariable, variable_hover);

    registry.register_diagnostics_handler(lint_symbol);
}

// ============================================================================
// COMPLETION
// ============================================================================

/// After `|`: every modifier, those accepting the current type first.
pub fn modifier_completions(
    request: &SuggestionRequest<'_>,
) -> Result<CompletionResponse, HookError> {
    if !request.is_modifier_position() {
        return Ok(CompletionResponse::default());
    }
    let input = request
        .symbol
        .map(|s| s.manifest_type.clone())
        .unwrap_or_default();
    let items = request
        .catalog
        .modifiers()
        .map(|modifier| {
            let item = CompletionItem::from_modifier(modifier);
            if !input.is_unknown() && modifier.accepts.contains(&input) {
                item.with_priority(10)
            } else {
                item
            }
        })
        .collect();
    Ok(CompletionResponse::exclusive(items))
}

/// Parameters of the tag under the caret that are not written yet.
pub fn parameter_completions(
    request: &SuggestionRequest<'_>,
) -> Result<CompletionResponse, HookError> {
    let (Some(symbol), Some(tag)) = (request.symbol, request.tag()) else {
        return Ok(CompletionResponse::default());
    };
    let elsewhere = request.is_head_position() || request.is_modifier_position();
    if elsewhere || request.parameter.is_some() {
        return Ok(CompletionResponse::default());
    }
    let items = tag
        .parameters_for(symbol)
        .iter()
        .filter(|definition| !symbol.parameters.iter().any(|p| definition.matches(&p.name)))
        .map(CompletionItem::from_parameter)
        .collect();
    Ok(CompletionResponse::new(items))
}

/// Tag names while the tag head is being typed.
pub fn tag_completions(request: &SuggestionRequest<'_>) -> Result<CompletionResponse, HookError> {
    if !request.is_head_position() || request.path_before().contains('.') {
        return Ok(CompletionResponse::default());
    }
    let items = request
        .catalog
        .tags()
        .map(|tag| CompletionItem::from_tag(tag))
        .collect();
    Ok(CompletionResponse::new(items))
}

/// Variables visible at the caret, or the members of the path typed so far.
///
/// Member access (`page.`) is exclusive.
pub fn variable_completions(
    request: &SuggestionRequest<'_>,
) -> Result<CompletionResponse, HookError> {
    let in_value = request.parameter.is_some_and(|p| p.is_variable_reference);
    let applies = request.is_inside_interpolation || request.is_head_position() || in_value;
    if !applies || request.is_modifier_position() {
        return Ok(CompletionResponse::default());
    }

    if let Some((parent, _)) = request.path_before().rsplit_once('.') {
        let Some(variable) = request.find_reference(parent) else {
            return Ok(CompletionResponse::exclusive(Vec::new()));
        };
        let items = request
            .scopes()
            .members_of(&variable)
            .iter()
            .map(CompletionItem::from_variable)
            .collect();
        return Ok(CompletionResponse::exclusive(items));
    }

    let items = request
        .visible_variables()
        .iter()
        .map(|variable| {
            let priority = if variable.is_internal() { 60 } else { 50 };
            CompletionItem::from_variable(variable).with_priority(priority)
        })
        .collect();
    Ok(CompletionResponse::new(items))
}

// ============================================================================
// HOVER
// ============================================================================

pub fn modifier_hover(request: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
    let hover = request.modifier().and_then(|record| {
        let definition = request.catalog.modifier(&record.name)?;
        Some(HoverResult::for_modifier(definition, record.span))
    });
    Ok(hover)
}

pub fn tag_hover(request: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
    if request.parameter.is_some() || request.modifier().is_some() {
        return Ok(None);
    }
    let hover = request
        .symbol
        .zip(request.tag())
        .map(|(symbol, tag)| HoverResult::for_tag(symbol, tag));
    Ok(hover)
}

/// The variable a symbol (or the interpolation under the caret) resolves to.
pub fn variable_hover(request: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
    let symbol = match request.interpolation {
        Some(interpolation) => request.document.symbol(interpolation.symbol),
        None => request.symbol.filter(|_| request.parameter.is_none()),
    };
    let hover = symbol.and_then(|symbol| {
        let variable = request.document.scope_variable(symbol.id)?;
        Some(HoverResult::for_variable(symbol, variable))
    });
    Ok(hover)
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Modifier style, unknown modifier, type mismatch and unknown parameter checks.
pub fn lint_symbol(request: &SymbolRequest<'_>) -> Result<Vec<Diagnostic>, HookError> {
    if !request.config.builtin_diagnostics {
        return Ok(Vec::new());
    }
    Ok(check_symbol(request.catalog, request.symbol))
}
