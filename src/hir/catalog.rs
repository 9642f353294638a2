//! Tag and modifier definitions.
//!
//! A [`Catalog`] is built once per session and read during analysis. Tags carry
//! a set of [`TagCapability`] variants; the engine dispatches on the variants a
//! definition carries rather than probing for optional hooks.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::error::{HookError, isolate_hook};
use super::schema::SchemaProvider;
use super::scope::ScopeArena;
use crate::base::{RuntimeType, ScopeId};
use crate::syntax::{CloseRequirement, Symbol, SymbolTable};

// ============================================================================
// CAPABILITIES
// ============================================================================

/// What an augmentation hook may read and modify.
pub struct AugmentContext<'a> {
    pub scopes: &'a mut ScopeArena,
    pub schema: &'a dyn SchemaProvider,
    pub symbols: &'a SymbolTable,
}

/// Changes the scope in effect after a tag.
pub trait ScopeAugmenter: Send + Sync {
    /// Return the scope to use from this symbol on; `scope` itself or a new one.
    fn augment(
        &self,
        ctx: &mut AugmentContext<'_>,
        symbol: &Symbol,
        scope: ScopeId,
    ) -> Result<ScopeId, HookError>;
}

impl<F> ScopeAugmenter for F
where
    F: Fn(&mut AugmentContext<'_>, &Symbol, ScopeId) -> Result<ScopeId, HookError> + Send + Sync,
{
    fn augment(
        &self,
        ctx: &mut AugmentContext<'_>,
        symbol: &Symbol,
        scope: ScopeId,
    ) -> Result<ScopeId, HookError> {
        self(ctx, symbol, scope)
    }
}

/// Decides per symbol whether a tag must be closed.
pub trait CloseResolver: Send + Sync {
    fn close_requirement(&self, symbol: &Symbol) -> CloseRequirement;
}

impl<F> CloseResolver for F
where
    F: Fn(&Symbol) -> CloseRequirement + Send + Sync,
{
    fn close_requirement(&self, symbol: &Symbol) -> CloseRequirement {
        self(symbol)
    }
}

/// Supplies parameters that depend on the symbol (method name, other params).
pub trait ParameterResolver: Send + Sync {
    fn parameters(&self, symbol: &Symbol) -> Result<Vec<ParameterDefinition>, HookError>;
}

impl<F> ParameterResolver for F
where
    F: Fn(&Symbol) -> Result<Vec<ParameterDefinition>, HookError> + Send + Sync,
{
    fn parameters(&self, symbol: &Symbol) -> Result<Vec<ParameterDefinition>, HookError> {
        self(symbol)
    }
}

/// The fixed set of capability kinds a tag may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Basic,
    ScopeAugmenting,
    CloseResolving,
    ParameterResolving,
}

#[derive(Clone)]
pub enum TagCapability {
    ScopeAugmenting(Arc<dyn ScopeAugmenter>),
    CloseResolving(Arc<dyn CloseResolver>),
    ParameterResolving(Arc<dyn ParameterResolver>),
}

impl TagCapability {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            TagCapability::ScopeAugmenting(_) => CapabilityKind::ScopeAugmenting,
            TagCapability::CloseResolving(_) => CapabilityKind::CloseResolving,
            TagCapability::ParameterResolving(_) => CapabilityKind::ParameterResolving,
        }
    }
}

impl fmt::Debug for TagCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// A parameter accepted by a tag or modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: SmolStr,
    pub description: String,
    pub aliases: Vec<SmolStr>,
    pub expects: RuntimeType,
    pub required: bool,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            aliases: Vec::new(),
            expects: RuntimeType::Unknown,
            required: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<SmolStr>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn expects(mut self, ty: RuntimeType) -> Self {
        self.expects = ty;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

/// A registered tag.
#[derive(Clone, Debug)]
pub struct TagDefinition {
    pub name: SmolStr,
    pub description: String,
    pub close: CloseRequirement,
    /// Open a fresh child scope for the tag body before any augmentation.
    pub inject_parent_scope: bool,
    pub parameters: Vec<ParameterDefinition>,
    /// Accept parameters not listed in `parameters` without complaint.
    pub allows_any_parameter: bool,
    capabilities: Vec<TagCapability>,
}

impl TagDefinition {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            close: CloseRequirement::Optional,
            inject_parent_scope: false,
            parameters: Vec::new(),
            allows_any_parameter: false,
            capabilities: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_close(mut self, close: CloseRequirement) -> Self {
        self.close = close;
        self
    }

    pub fn requires_close(self) -> Self {
        self.with_close(CloseRequirement::Required)
    }

    pub fn injects_parent_scope(mut self) -> Self {
        self.inject_parent_scope = true;
        self
    }

    pub fn allowing_any_parameter(mut self) -> Self {
        self.allows_any_parameter = true;
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_capability(mut self, capability: TagCapability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn with_augmenter<F>(self, augmenter: F) -> Self
    where
        F: Fn(&mut AugmentContext<'_>, &Symbol, ScopeId) -> Result<ScopeId, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.with_capability(TagCapability::ScopeAugmenting(Arc::new(augmenter)))
    }

    pub fn with_close_resolver<F>(self, resolver: F) -> Self
    where
        F: Fn(&Symbol) -> CloseRequirement + Send + Sync + 'static,
    {
        self.with_capability(TagCapability::CloseResolving(Arc::new(resolver)))
    }

    pub fn with_parameter_resolver<F>(self, resolver: F) -> Self
    where
        F: Fn(&Symbol) -> Result<Vec<ParameterDefinition>, HookError> + Send + Sync + 'static,
    {
        self.with_capability(TagCapability::ParameterResolving(Arc::new(resolver)))
    }

    pub fn capabilities(&self) -> &[TagCapability] {
        &self.capabilities
    }

    /// Capability kinds carried, `Basic` when there are none.
    pub fn kinds(&self) -> Vec<CapabilityKind> {
        if self.capabilities.is_empty() {
            return vec![CapabilityKind::Basic];
        }
        let mut kinds: Vec<_> = self.capabilities.iter().map(TagCapability::kind).collect();
        kinds.dedup();
        kinds
    }

    pub fn has_capability(&self, kind: CapabilityKind) -> bool {
        self.kinds().contains(&kind)
    }

    pub fn augmenter(&self) -> Option<&Arc<dyn ScopeAugmenter>> {
        self.capabilities.iter().find_map(|c| match c {
            TagCapability::ScopeAugmenting(hook) => Some(hook),
            _ => None,
        })
    }

    /// Close requirement for one use of the tag.
    pub fn close_requirement(&self, symbol: &Symbol) -> CloseRequirement {
        self.capabilities
            .iter()
            .find_map(|c| match c {
                TagCapability::CloseResolving(hook) => Some(hook.close_requirement(symbol)),
                _ => None,
            })
            .unwrap_or(self.close)
    }

    /// Static parameters plus whatever resolvers contribute for this symbol.
    pub fn parameters_for(&self, symbol: &Symbol) -> Vec<ParameterDefinition> {
        let mut parameters = self.parameters.clone();
        for capability in &self.capabilities {
            if let TagCapability::ParameterResolving(hook) = capability {
                let extra = isolate_hook("parameters", &self.name, || hook.parameters(symbol));
                parameters.extend(extra.unwrap_or_default());
            }
        }
        parameters
    }
}

/// A registered modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierDefinition {
    pub name: SmolStr,
    pub description: String,
    /// Accepted input types; empty accepts anything.
    pub accepts: Vec<RuntimeType>,
    /// `Unknown` passes the input type through.
    pub returns: RuntimeType,
    pub parameters: Vec<ParameterDefinition>,
}

impl ModifierDefinition {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            accepts: Vec::new(),
            returns: RuntimeType::Unknown,
            parameters: Vec::new(),
        }
    }

    pub fn typed(
        name: impl Into<SmolStr>,
        accepts: impl IntoIterator<Item = RuntimeType>,
        returns: RuntimeType,
    ) -> Self {
        Self {
            accepts: accepts.into_iter().collect(),
            returns,
            ..Self::new(name)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn accepts_type(&self, input: &RuntimeType) -> bool {
        input.is_unknown()
            || self.accepts.is_empty()
            || self.accepts.iter().any(|t| t.is_unknown() || t == input)
    }

    pub fn return_type(&self, input: &RuntimeType) -> RuntimeType {
        if self.returns.is_unknown() {
            input.clone()
        } else {
            self.returns.clone()
        }
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Registered tags and modifiers. The last registration for a name wins.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    tags: IndexMap<SmolStr, Arc<TagDefinition>>,
    modifiers: IndexMap<SmolStr, Arc<ModifierDefinition>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tag(&mut self, tag: TagDefinition) {
        self.tags.insert(tag.name.clone(), Arc::new(tag));
    }

    pub fn register_tags(&mut self, tags: impl IntoIterator<Item = TagDefinition>) {
        for tag in tags {
            self.register_tag(tag);
        }
    }

    /// Register a tag from its name and parameter names.
    pub fn register_tag_shorthand(&mut self, name: &str, parameters: &[&str]) {
        let tag = parameters
            .iter()
            .fold(TagDefinition::new(name), |tag, p| {
                tag.with_parameter(ParameterDefinition::new(*p))
            });
        self.register_tag(tag);
    }

    pub fn register_modifier(&mut self, modifier: ModifierDefinition) {
        self.modifiers
            .insert(modifier.name.clone(), Arc::new(modifier));
    }

    pub fn register_modifiers(&mut self, modifiers: impl IntoIterator<Item = ModifierDefinition>) {
        for modifier in modifiers {
            self.register_modifier(modifier);
        }
    }

    /// Register a modifier from its name and type names (`"string"`, `"*"`, ...).
    pub fn register_modifier_shorthand(&mut self, name: &str, accepts: &[&str], returns: &str) {
        self.register_modifier(ModifierDefinition::typed(
            name,
            accepts.iter().map(|t| RuntimeType::parse(t)),
            RuntimeType::parse(returns),
        ));
    }

    pub fn tag(&self, name: &str) -> Option<&Arc<TagDefinition>> {
        self.tags.get(name)
    }

    pub fn modifier(&self, name: &str) -> Option<&Arc<ModifierDefinition>> {
        self.modifiers.get(name)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    pub fn tags(&self) -> impl Iterator<Item = &Arc<TagDefinition>> {
        self.tags.values()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Arc<ModifierDefinition>> {
        self.modifiers.values()
    }

    /// Tag definition for a symbol: qualified runtime name first, then tag name.
    pub fn resolve_tag(&self, symbol: &Symbol) -> Option<&Arc<TagDefinition>> {
        if symbol.is_interpolation || symbol.is_comment {
            return None;
        }
        self.tags
            .get(symbol.runtime_name.as_str())
            .or_else(|| self.tags.get(symbol.tag_name.as_str()))
    }

    /// Close requirement used while pairing. Unregistered names may pair.
    pub fn close_requirement(&self, symbol: &Symbol) -> CloseRequirement {
        self.resolve_tag(symbol)
            .map(|tag| tag.close_requirement(symbol))
            .unwrap_or(CloseRequirement::Optional)
    }
}
