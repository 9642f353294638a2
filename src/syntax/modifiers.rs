//! Modifier chains attached to a value.
//!
//! Records are produced here with their positions; the `hir` layer resolves
//! them against the modifier catalog and fills in the type fields.

use smol_str::SmolStr;

use crate::base::{RuntimeType, Span};

/// How a modifier was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierStyle {
    /// `{{ title | upper | truncate:20 }}`
    Shorthand,
    /// `{{ title upper="true" truncate="20" }}`
    Parameter,
}

/// One argument passed to a modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierArg {
    /// Argument text without quotes.
    pub text: SmolStr,
    pub span: Span,
}

/// One modifier applied to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierRecord {
    pub name: SmolStr,
    pub style: ModifierStyle,
    pub name_span: Span,
    /// Span covering the name and all arguments.
    pub span: Span,
    pub args: Vec<ModifierArg>,
    pub has_registered_modifier: bool,
    /// Type assumed to flow into this modifier.
    pub input_type: RuntimeType,
    /// Type flowing out; equals `input_type` when the modifier is unregistered.
    pub output_type: RuntimeType,
}

impl ModifierRecord {
    pub fn new(name: impl Into<SmolStr>, style: ModifierStyle, name_span: Span) -> Self {
        Self {
            name: name.into(),
            style,
            name_span,
            span: name_span,
            args: Vec::new(),
            has_registered_modifier: false,
            input_type: RuntimeType::Unknown,
            output_type: RuntimeType::Unknown,
        }
    }

    pub fn with_arg(mut self, arg: ModifierArg) -> Self {
        self.span = self.span.cover(&arg.span);
        self.args.push(arg);
        self
    }
}

/// Ordered modifiers applied to one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierChain {
    records: Vec<ModifierRecord>,
    /// Type of the value before any modifier is applied.
    pub source_type: RuntimeType,
    /// Type after folding the chain left to right.
    pub manifest_type: RuntimeType,
}

impl ModifierChain {
    pub fn new(records: Vec<ModifierRecord>) -> Self {
        Self {
            records,
            source_type: RuntimeType::Unknown,
            manifest_type: RuntimeType::Unknown,
        }
    }

    pub fn push(&mut self, record: ModifierRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ModifierRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [ModifierRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&ModifierRecord> {
        self.records.last()
    }

    pub fn shorthand(&self) -> impl Iterator<Item = &ModifierRecord> {
        self.records
            .iter()
            .filter(|r| r.style == ModifierStyle::Shorthand)
    }

    pub fn parameter_style(&self) -> impl Iterator<Item = &ModifierRecord> {
        self.records
            .iter()
            .filter(|r| r.style == ModifierStyle::Parameter)
    }

    /// Both shorthand and parameter-style modifiers on the same value.
    pub fn has_mixed_styles(&self) -> bool {
        self.shorthand().next().is_some() && self.parameter_style().next().is_some()
    }

    /// The record whose span contains the offset.
    pub fn record_at(&self, offset: u32) -> Option<&ModifierRecord> {
        self.records
            .iter()
            .find(|r| r.span.contains_inclusive(offset))
    }
}
