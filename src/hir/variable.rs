use std::sync::Arc;

use smol_str::SmolStr;

use super::schema::BlueprintField;
use crate::base::{RuntimeType, ScopeId};
use crate::syntax::SymbolId;

/// Prefix marking bindings contributed by the engine itself.
pub const INTERNAL_SOURCE_PREFIX: &str = "*internal.";

/// A named binding in a scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeVariable {
    pub name: SmolStr,
    pub data_type: RuntimeType,
    /// Backing schema field, if the binding came from one.
    pub field: Option<Arc<BlueprintField>>,
    /// Provenance label (`collection:posts`, `*internal.loop`, ...).
    pub source_name: SmolStr,
    /// `None` for globals and other built-in bindings.
    pub introduced_by: Option<SymbolId>,
    /// Scope holding the members reachable through `name.member`.
    pub members: Option<ScopeId>,
}

impl ScopeVariable {
    pub fn new(name: impl Into<SmolStr>, data_type: RuntimeType) -> Self {
        Self {
            name: name.into(),
            data_type,
            field: None,
            source_name: SmolStr::default(),
            introduced_by: None,
            members: None,
        }
    }

    /// A binding typed from a schema field and named after its handle.
    pub fn from_field(field: Arc<BlueprintField>) -> Self {
        let mut variable = Self::new(field.handle.clone(), RuntimeType::for_field(&field));
        variable.field = Some(field);
        variable
    }

    /// Engine-provided binding (`count`, `first`, `key`, ...).
    pub fn internal(name: impl Into<SmolStr>, data_type: RuntimeType, source: &str) -> Self {
        Self::new(name, data_type).with_source(format!("{INTERNAL_SOURCE_PREFIX}{source}"))
    }

    pub fn with_source(mut self, source: impl Into<SmolStr>) -> Self {
        self.source_name = source.into();
        self
    }

    pub fn introduced_by(mut self, symbol: SymbolId) -> Self {
        self.introduced_by = Some(symbol);
        self
    }

    pub fn with_members(mut self, members: ScopeId) -> Self {
        self.members = Some(members);
        self
    }

    pub fn with_field(mut self, field: Arc<BlueprintField>) -> Self {
        self.field = Some(field);
        self
    }

    pub fn is_internal(&self) -> bool {
        self.source_name.starts_with(INTERNAL_SOURCE_PREFIX)
    }

    /// Instruction text of the backing field.
    pub fn instructions(&self) -> Option<&str> {
        self.field.as_ref()?.instructions.as_deref()
    }
}
