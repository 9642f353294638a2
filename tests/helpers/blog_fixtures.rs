//! A small blog site: one `posts` collection, a few globals, and the tags and
//! modifiers templates for it use.

use std::sync::Arc;

use antlers::hir::{
    AugmentContext, BlueprintField, Catalog, HookError, ModifierDefinition, ParameterDefinition,
    RuntimeType, SchemaCategory, ScopeId, StaticSchema, TagDefinition,
};
use antlers::ide::{CapabilityRegistry, register_defaults};
use antlers::syntax::Symbol;
use once_cell::sync::Lazy;

/// Schema shared by every test; building it once keeps the fixtures cheap.
pub static BLOG_SCHEMA: Lazy<Arc<StaticSchema>> = Lazy::new(|| {
    Arc::new(
        StaticSchema::new()
            .with_fields(
                SchemaCategory::Collection,
                "posts",
                [
                    BlueprintField::new("title", "text")
                        .with_instructions("The headline shown in listings."),
                    BlueprintField::new("date", "date"),
                    BlueprintField::new("tags", "terms"),
                ],
            )
            .with_global(BlueprintField::new("title", "text"))
            .with_global(BlueprintField::new("site_name", "text"))
            .with_global(BlueprintField::new("slug", "slug")),
    )
});

/// `{{ collection:handle }}` registers a list named after the handle.
fn collection_augmenter(
    ctx: &mut AugmentContext<'_>,
    symbol: &Symbol,
    scope: ScopeId,
) -> Result<ScopeId, HookError> {
    let handle = symbol.method_name.clone().unwrap_or_default();
    let fields = ctx.schema.fields(SchemaCategory::Collection, &handle);
    ctx.scopes.add_list_from_fields(
        scope,
        handle.clone(),
        fields,
        &format!("collection:{handle}"),
        Some(symbol.id),
    );
    Ok(scope)
}

pub fn blog_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register_tag(
        TagDefinition::new("collection")
            .with_description("Fetch entries from a collection.")
            .with_augmenter(collection_augmenter),
    );
    catalog.register_tag(
        TagDefinition::new("partial")
            .with_description("Render another template.")
            .with_parameter(ParameterDefinition::new("src").required())
            .with_parameter(ParameterDefinition::new("cache").expects(RuntimeType::Boolean)),
    );
    catalog.register_tag(TagDefinition::new("if").requires_close());
    catalog.register_modifiers([
        ModifierDefinition::typed("upper", [RuntimeType::String], RuntimeType::String)
            .with_description("Uppercase a string."),
        ModifierDefinition::typed("lower", [RuntimeType::String], RuntimeType::String),
        ModifierDefinition::typed("length", [RuntimeType::Array], RuntimeType::Number),
        ModifierDefinition::new("trim"),
    ]);
    catalog
}

/// The blog catalog with the built-in handlers installed.
pub fn blog_registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::with_catalog(blog_catalog());
    register_defaults(&mut registry);
    registry
}
