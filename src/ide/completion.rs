//! Completion items and response merging.

use std::sync::Arc;

use crate::hir::{ModifierDefinition, ParameterDefinition, ScopeVariable, TagDefinition};

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Variable,
    Tag,
    Parameter,
    Modifier,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Variable => 6,   // Variable
            CompletionKind::Tag => 3,        // Function
            CompletionKind::Parameter => 5,  // Field
            CompletionKind::Modifier => 2,   // Method
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Text to insert (if different from label).
    pub insert_text: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    /// Create a new completion item.
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_priority: 100,
        }
    }

    /// Set the detail text.
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the documentation.
    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Set the insert text.
    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Set the sort priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    /// Create from a scope variable.
    pub fn from_variable(variable: &ScopeVariable) -> Self {
        let mut item = Self::new(variable.name.as_str(), CompletionKind::Variable)
            .with_detail(format!("{} ({})", variable.data_type, variable.source_name));
        if let Some(instructions) = variable.instructions() {
            item.documentation = Some(Arc::from(instructions));
        }
        item
    }

    /// Create from a tag definition.
    pub fn from_tag(tag: &TagDefinition) -> Self {
        let mut item = Self::new(tag.name.as_str(), CompletionKind::Tag).with_detail("tag");
        if !tag.description.is_empty() {
            item.documentation = Some(Arc::from(tag.description.as_str()));
        }
        item
    }

    /// Create from a parameter definition; inserts `name=""`.
    pub fn from_parameter(parameter: &ParameterDefinition) -> Self {
        let mut item = Self::new(parameter.name.as_str(), CompletionKind::Parameter)
            .with_insert_text(format!("{}=\"\"", parameter.name))
            .with_detail(parameter.expects.to_string());
        if parameter.required {
            item.sort_priority = 10;
        }
        if !parameter.description.is_empty() {
            item.documentation = Some(Arc::from(parameter.description.as_str()));
        }
        item
    }

    /// Create from a modifier definition.
    pub fn from_modifier(modifier: &ModifierDefinition) -> Self {
        let mut item = Self::new(modifier.name.as_str(), CompletionKind::Modifier)
            .with_detail(format!("→ {}", modifier.returns));
        if !modifier.description.is_empty() {
            item.documentation = Some(Arc::from(modifier.description.as_str()));
        }
        item
    }
}

/// What one completion handler contributed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    pub items: Vec<CompletionItem>,
    /// Later handlers are skipped once a response sets this.
    pub is_exclusive_result: bool,
}

impl CompletionResponse {
    pub fn new(items: Vec<CompletionItem>) -> Self {
        Self {
            items,
            is_exclusive_result: false,
        }
    }

    pub fn exclusive(items: Vec<CompletionItem>) -> Self {
        Self {
            items,
            is_exclusive_result: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<CompletionItem>> for CompletionResponse {
    fn from(items: Vec<CompletionItem>) -> Self {
        Self::new(items)
    }
}

/// Concatenate responses in order, stopping after the first exclusive one.
///
/// The merged list is ordered by priority, then label; duplicate labels of the
/// same kind keep the first occurrence.
pub fn merge_completions(
    responses: impl IntoIterator<Item = CompletionResponse>,
) -> CompletionResponse {
    let mut merged = CompletionResponse::default();
    for response in responses {
        merged.items.extend(response.items);
        if response.is_exclusive_result {
            merged.is_exclusive_result = true;
            break;
        }
    }
    finalize(&mut merged.items);
    merged
}

pub(crate) fn finalize(items: &mut Vec<CompletionItem>) {
    let mut seen = rustc_hash::FxHashSet::default();
    items.retain(|item| seen.insert((item.label.clone(), item.kind)));
    items.sort_by(|a, b| {
        a.sort_priority
            .cmp(&b.sort_priority)
            .then_with(|| a.label.cmp(&b.label))
    });
}
