//! Schema snapshots consumed by the engine.
//!
//! Blueprint fields, fieldsets and replicator sets are supplied by the host
//! through a [`SchemaProvider`]. The engine only reads them; every field is
//! shared behind an `Arc` so scope variables and symbols can point at the
//! definition they came from.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Where a set of fields comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SchemaCategory {
    Blueprint,
    Collection,
    Taxonomy,
    Form,
    AssetContainer,
    User,
    Global,
}

impl SchemaCategory {
    pub fn display(&self) -> &'static str {
        match self {
            SchemaCategory::Blueprint => "blueprint",
            SchemaCategory::Collection => "collection",
            SchemaCategory::Taxonomy => "taxonomy",
            SchemaCategory::Form => "form",
            SchemaCategory::AssetContainer => "asset container",
            SchemaCategory::User => "user",
            SchemaCategory::Global => "global",
        }
    }
}

/// One named, typed content field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlueprintField {
    pub handle: SmolStr,
    /// Fieldtype handle (`text`, `replicator`, `entries`, ...).
    pub field_type: SmolStr,
    pub display: Option<String>,
    pub instructions: Option<String>,
    /// Sets of a replicator/bard field.
    pub sets: Vec<FieldSet>,
    /// Nested fields of a grid/group field.
    pub fields: Vec<Arc<BlueprintField>>,
    /// Handles a relationship field points at (collections, taxonomies, containers).
    pub references: Vec<SmolStr>,
    pub max_items: Option<u32>,
}

impl BlueprintField {
    pub fn new(handle: impl Into<SmolStr>, field_type: impl Into<SmolStr>) -> Self {
        Self {
            handle: handle.into(),
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_set(mut self, set: FieldSet) -> Self {
        self.sets.push(set);
        self
    }

    pub fn with_field(mut self, field: BlueprintField) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    pub fn with_reference(mut self, handle: impl Into<SmolStr>) -> Self {
        self.references.push(handle.into());
        self
    }

    pub fn with_max_items(mut self, max: u32) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Nested fields available on each element: grid/group fields plus the
    /// union of every set's fields. Earlier definitions win on handle clashes.
    pub fn member_fields(&self) -> Vec<Arc<BlueprintField>> {
        let mut merged: IndexMap<SmolStr, Arc<BlueprintField>> = IndexMap::new();
        let set_fields = self.sets.iter().flat_map(|set| set.fields.iter());
        for field in self.fields.iter().chain(set_fields) {
            merged
                .entry(field.handle.clone())
                .or_insert_with(|| field.clone());
        }
        merged.into_values().collect()
    }

    pub fn has_members(&self) -> bool {
        !self.fields.is_empty() || self.sets.iter().any(|s| !s.fields.is_empty())
    }
}

/// One set of a replicator/bard field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldSet {
    pub handle: SmolStr,
    pub display: Option<String>,
    pub fields: Vec<Arc<BlueprintField>>,
}

impl FieldSet {
    pub fn new(handle: impl Into<SmolStr>) -> Self {
        Self {
            handle: handle.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: BlueprintField) -> Self {
        self.fields.push(Arc::new(field));
        self
    }
}

/// A reusable group of fields imported into blueprints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Fieldset {
    pub handle: SmolStr,
    pub fields: Vec<Arc<BlueprintField>>,
}

/// Query interface over the host's schema snapshot.
///
/// All methods are lookups; a miss returns an empty result.
pub trait SchemaProvider: Send + Sync {
    /// Fields defined for a handle in a category.
    fn fields(&self, category: SchemaCategory, handle: &str) -> Vec<Arc<BlueprintField>>;

    /// All handles known in a category.
    fn handles(&self, category: SchemaCategory) -> Vec<SmolStr>;

    /// Fields injected into every document's root scope.
    fn globals(&self) -> Vec<Arc<BlueprintField>> {
        Vec::new()
    }

    fn fieldset(&self, _handle: &str) -> Option<Fieldset> {
        None
    }

    fn has_addon(&self, _package: &str) -> bool {
        false
    }

    fn addon_version(&self, _package: &str) -> Option<SmolStr> {
        None
    }
}

/// A provider that knows nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySchema;

impl SchemaProvider for EmptySchema {
    fn fields(&self, _category: SchemaCategory, _handle: &str) -> Vec<Arc<BlueprintField>> {
        Vec::new()
    }

    fn handles(&self, _category: SchemaCategory) -> Vec<SmolStr> {
        Vec::new()
    }
}

/// In-memory schema snapshot.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaticSchema {
    entries: IndexMap<SchemaCategory, IndexMap<SmolStr, Vec<Arc<BlueprintField>>>>,
    globals: Vec<Arc<BlueprintField>>,
    fieldsets: IndexMap<SmolStr, Fieldset>,
    addons: FxHashMap<SmolStr, SmolStr>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot serialized as JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_fields(
        mut self,
        category: SchemaCategory,
        handle: impl Into<SmolStr>,
        fields: impl IntoIterator<Item = BlueprintField>,
    ) -> Self {
        self.entries
            .entry(category)
            .or_default()
            .entry(handle.into())
            .or_default()
            .extend(fields.into_iter().map(Arc::new));
        self
    }

    pub fn with_global(mut self, field: BlueprintField) -> Self {
        self.globals.push(Arc::new(field));
        self
    }

    pub fn with_fieldset(mut self, fieldset: Fieldset) -> Self {
        self.fieldsets.insert(fieldset.handle.clone(), fieldset);
        self
    }

    pub fn with_addon(mut self, package: impl Into<SmolStr>, version: impl Into<SmolStr>) -> Self {
        self.addons.insert(package.into(), version.into());
        self
    }
}

impl SchemaProvider for StaticSchema {
    fn fields(&self, category: SchemaCategory, handle: &str) -> Vec<Arc<BlueprintField>> {
        self.entries
            .get(&category)
            .and_then(|by_handle| by_handle.get(handle))
            .cloned()
            .unwrap_or_default()
    }

    fn handles(&self, category: SchemaCategory) -> Vec<SmolStr> {
        self.entries
            .get(&category)
            .map(|by_handle| by_handle.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn globals(&self) -> Vec<Arc<BlueprintField>> {
        self.globals.clone()
    }

    fn fieldset(&self, handle: &str) -> Option<Fieldset> {
        self.fieldsets.get(handle).cloned()
    }

    fn has_addon(&self, package: &str) -> bool {
        self.addons.contains_key(package)
    }

    fn addon_version(&self, package: &str) -> Option<SmolStr> {
        self.addons.get(package).cloned()
    }
}
