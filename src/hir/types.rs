//! Type inference over fields, variables and modifier chains.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::catalog::Catalog;
use super::modifiers::resolve_chain;
use super::schema::{BlueprintField, SchemaCategory, SchemaProvider};
use super::variable::ScopeVariable;
use crate::base::RuntimeType;
use crate::syntax::{ModifierChain, Symbol};

impl RuntimeType {
    /// Runtime type of a blueprint field.
    ///
    /// Relationship fields limited to a single item yield `Object`.
    pub fn for_field(field: &BlueprintField) -> Self {
        let base = Self::for_field_type(&field.field_type);
        if base.is_array() && field.max_items == Some(1) && is_relationship(&field.field_type) {
            return RuntimeType::Object;
        }
        base
    }
}

fn is_relationship(field_type: &str) -> bool {
    matches!(field_type, "entries" | "terms" | "assets" | "users")
}

/// Result of type inference for one value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssumedType {
    pub assumed_type: RuntimeType,
    /// The value is a list whose elements expose `referenced_fields`.
    pub does_reference_collection: bool,
    /// Union of fields available on each element (or on the related item).
    pub referenced_fields: Vec<Arc<BlueprintField>>,
}

impl AssumedType {
    pub fn of(assumed_type: RuntimeType) -> Self {
        Self {
            assumed_type,
            ..Self::default()
        }
    }
}

/// Computes assumed types from field metadata and modifier chains.
///
/// Only reads the schema and catalog; annotations are written to the
/// modifier chain passed in.
pub struct TypeInference<'a> {
    catalog: &'a Catalog,
    schema: &'a dyn SchemaProvider,
}

impl<'a> TypeInference<'a> {
    pub fn new(catalog: &'a Catalog, schema: &'a dyn SchemaProvider) -> Self {
        Self { catalog, schema }
    }

    /// Seed type and element fields of a blueprint field.
    pub fn infer_field(&self, field: &BlueprintField) -> AssumedType {
        let assumed_type = RuntimeType::for_field(field);
        let mut referenced = field.member_fields();
        if referenced.is_empty() && is_relationship(&field.field_type) {
            referenced = self.related_fields(field);
        }
        AssumedType {
            does_reference_collection: assumed_type.is_array(),
            assumed_type,
            referenced_fields: referenced,
        }
    }

    /// Fields exposed by the items a relationship field points at.
    fn related_fields(&self, field: &BlueprintField) -> Vec<Arc<BlueprintField>> {
        let category = match field.field_type.as_str() {
            "entries" => SchemaCategory::Collection,
            "terms" => SchemaCategory::Taxonomy,
            "assets" => SchemaCategory::AssetContainer,
            "users" => SchemaCategory::User,
            _ => return Vec::new(),
        };
        let mut merged: IndexMap<SmolStr, Arc<BlueprintField>> = IndexMap::new();
        for handle in &field.references {
            for related in self.schema.fields(category, handle) {
                merged.entry(related.handle.clone()).or_insert(related);
            }
        }
        merged.into_values().collect()
    }

    /// Assumed type of a variable, before any modifier is applied.
    pub fn infer_variable(&self, variable: &ScopeVariable) -> AssumedType {
        match &variable.field {
            Some(field) => self.infer_field(field),
            None => AssumedType {
                does_reference_collection: variable.data_type.is_array(),
                assumed_type: variable.data_type.clone(),
                referenced_fields: Vec::new(),
            },
        }
    }

    /// Fold a modifier chain over the source type, annotating every link.
    /// Returns the manifest type.
    pub fn apply_modifiers(&self, chain: &mut ModifierChain, source: RuntimeType) -> RuntimeType {
        resolve_chain(self.catalog, chain, source)
    }

    /// Assumed type of a variable as seen through a modifier chain.
    pub fn infer(
        &self,
        variable: Option<&ScopeVariable>,
        chain: &mut ModifierChain,
    ) -> AssumedType {
        let mut assumed = variable
            .map(|v| self.infer_variable(v))
            .unwrap_or_default();
        let manifest = self.apply_modifiers(chain, assumed.assumed_type.clone());
        if manifest != assumed.assumed_type {
            assumed.does_reference_collection = manifest.is_array();
            if !manifest.is_array() {
                assumed.referenced_fields.clear();
            }
            assumed.assumed_type = manifest;
        }
        assumed
    }

    /// Annotate a symbol resolved to `variable` with its source and manifest
    /// types.
    pub fn annotate(&self, symbol: &mut Symbol, variable: Option<&ScopeVariable>) {
        let source = variable
            .map(|v| self.infer_variable(v).assumed_type)
            .unwrap_or_default();
        let manifest = self.apply_modifiers(&mut symbol.modifiers, source.clone());
        symbol.source_type = source;
        symbol.manifest_type = manifest;
    }
}
