//! Hover information.

use crate::base::Span;
use crate::hir::{ModifierDefinition, ScopeVariable, TagDefinition};
use crate::syntax::Symbol;

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// Range the hover applies to, if narrower than the caret.
    pub span: Option<Span>,
}

impl HoverResult {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Hover for a resolved variable reference.
    ///
    /// Shows the type after modifiers, the provenance and the field's
    /// instruction text.
    pub fn for_variable(symbol: &Symbol, variable: &ScopeVariable) -> Self {
        let mut contents = format!(
            "```antlers\n{}: {}\n```",
            symbol.adjusted_name, symbol.manifest_type
        );
        if symbol.manifest_type != symbol.source_type {
            contents.push_str(&format!("\n\nSource type: `{}`", symbol.source_type));
        }
        if !variable.source_name.is_empty() {
            contents.push_str(&format!("\n\nProvided by `{}`", variable.source_name));
        }
        if let Some(field) = &variable.field {
            contents.push_str(&format!("\n\nField type: `{}`", field.field_type));
        }
        if let Some(instructions) = variable.instructions() {
            contents.push_str("\n\n");
            contents.push_str(instructions);
        }
        Self::new(contents).with_span(symbol.span)
    }

    pub fn for_tag(symbol: &Symbol, tag: &TagDefinition) -> Self {
        let mut contents = format!("```antlers\n{{{{ {} }}}}\n```", tag.name);
        if !tag.description.is_empty() {
            contents.push_str("\n\n");
            contents.push_str(&tag.description);
        }
        if !tag.parameters.is_empty() {
            contents.push_str("\n\n**Parameters**\n");
            for parameter in &tag.parameters {
                let marker = if parameter.required { " (required)" } else { "" };
                contents.push_str(&format!("\n- `{}`{marker}", parameter.name));
            }
        }
        Self::new(contents).with_span(symbol.span)
    }

    pub fn for_modifier(modifier: &ModifierDefinition, span: Span) -> Self {
        let accepts = if modifier.accepts.is_empty() {
            "*".to_string()
        } else {
            modifier
                .accepts
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(" | ")
        };
        let mut contents = format!(
            "```antlers\n{}({accepts}) → {}\n```",
            modifier.name, modifier.returns
        );
        if !modifier.description.is_empty() {
            contents.push_str("\n\n");
            contents.push_str(&modifier.description);
        }
        Self::new(contents).with_span(span)
    }
}
