//! Scope building and variable resolution over whole documents.

use antlers::hir::{AugmentContext, Catalog, HookError, RuntimeType, ScopeId, TagDefinition};
use antlers::hir::{AnalysisConfig, EmptySchema, ScopeArena, ScopeBuilder, ScopeVariable, codes};
use antlers::syntax::{Symbol, SymbolId};
use rstest::rstest;

use crate::helpers::host_helpers::analyze;

fn resolved_source(text: &str, index: usize) -> Option<String> {
    let analysis = analyze(text);
    analysis
        .scope_variable(SymbolId::new(index))
        .map(|v| v.source_name.to_string())
}

// =============================================================================
// LOOPS OVER COLLECTIONS
// =============================================================================

#[test]
fn test_collection_fields_visible_only_inside_loop() {
    let text = "{{ collection:posts }}{{ posts }}{{ date }}{{ /posts }}{{ date }}";
    let analysis = analyze(text);
    let symbols = analysis.symbols.symbols();

    let inner = analysis.scope_variable(symbols[2].id).expect("date inside the loop");
    assert_eq!(inner.source_name, "collection:posts");
    assert_eq!(symbols[2].manifest_type, RuntimeType::Date);
    assert!(analysis.scope_variable(symbols[4].id).is_none());
    assert_eq!(symbols[4].manifest_type, RuntimeType::Unknown);
}

#[test]
fn test_loop_helpers_inside_loop_body() {
    let text = "{{ collection:posts }}{{ posts }}{{ index }} {{ first }}{{ /posts }}{{ index }}";
    let analysis = analyze(text);
    let symbols = analysis.symbols.symbols();

    let index = analysis.scope_variable(symbols[2].id).expect("index is bound");
    assert_eq!(index.data_type, RuntimeType::Number);
    assert_eq!(index.introduced_by, Some(symbols[1].id));
    assert_eq!(symbols[3].manifest_type, RuntimeType::Boolean);
    assert!(analysis.scope_variable(symbols[5].id).is_none());
}

/// The nearest scope wins; `title` inside the loop is the entry's field.
#[test]
fn test_lifting_a_list_twice_exposes_the_same_members() {
    let mut arena = ScopeArena::new();
    let root = arena.new_root("document");
    arena.add_list(
        root,
        ScopeVariable::new("posts", RuntimeType::Array),
        [
            ScopeVariable::new("title", RuntimeType::String),
            ScopeVariable::new("date", RuntimeType::Date),
        ],
    );

    let names = |arena: &ScopeArena, scope: ScopeId| -> Vec<String> {
        arena
            .local_variables(scope)
            .iter()
            .map(|v| v.name.to_string())
            .collect()
    };
    let first = arena.lift_list(root, "posts").expect("posts is a list");
    let second = arena.lift_list(first, "posts").expect("posts is still visible");

    assert_eq!(names(&arena, first), vec!["title", "date"]);
    assert_eq!(names(&arena, first), names(&arena, second));
    assert_eq!(arena.parent(second), Some(first));
}

#[rstest]
#[case("{{ collection:posts }}{{ posts }}{{ title }}{{ /posts }}", 2, "collection:posts")]
#[case("{{ collection:posts }}{{ posts }}{{ /posts }}{{ title }}", 3, "*internal.globals")]
#[case("{{ title }}", 0, "*internal.globals")]
fn test_nearest_binding_wins(#[case] text: &str, #[case] index: usize, #[case] source: &str) {
    assert_eq!(resolved_source(text, index).as_deref(), Some(source));
}

#[test]
fn test_closing_tag_restores_outer_scope() {
    let text = "{{ collection:posts }}{{ posts }}{{ title }}{{ /posts }}{{ site_name }}";
    let analysis = analyze(text);
    let symbols = analysis.symbols.symbols();

    let closer = &symbols[3];
    assert_eq!(closer.belongs_to, Some(symbols[1].id));
    assert_eq!(closer.scope, Some(analysis.root_scope));
    assert_eq!(symbols[4].scope, Some(analysis.root_scope));
    assert_ne!(symbols[1].scope, Some(analysis.root_scope));
}

#[test]
fn test_dotted_paths_resolve_through_list_members() {
    let text = "{{ collection:posts }}{{ posts.0.date }}{{ posts.missing }}";
    let analysis = analyze(text);
    let symbols = analysis.symbols.symbols();

    assert_eq!(symbols[1].manifest_type, RuntimeType::Date);
    assert!(analysis.scope_variable(symbols[2].id).is_none());
}

// =============================================================================
// INTERPOLATIONS
// =============================================================================

#[test]
fn test_interpolations_resolve_in_owner_scope() {
    let text = r#"{{ collection:posts }}{{ posts }}{{ partial src="cards/{slug}-{date}" }}{{ /posts }}"#;
    let analysis = analyze(text);
    let partial = &analysis.symbols.symbols()[2];
    assert_eq!(partial.adjusted_name, "partial");

    let resolved: Vec<_> = analysis
        .symbols
        .interpolations_of(partial.id)
        .into_iter()
        .map(|i| {
            let variable = analysis.scope_variable(i.symbol);
            (i.text.to_string(), variable.map(|v| v.data_type.clone()))
        })
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("slug".to_string(), Some(RuntimeType::String)),
            ("date".to_string(), Some(RuntimeType::Date)),
        ]
    );
}

// =============================================================================
// AUGMENTATION HOOKS
// =============================================================================

fn panicking_augmenter(
    _ctx: &mut AugmentContext<'_>,
    _symbol: &Symbol,
    _scope: ScopeId,
) -> Result<ScopeId, HookError> {
    panic!("augmenter failed")
}

fn binding_augmenter(
    ctx: &mut AugmentContext<'_>,
    symbol: &Symbol,
    scope: ScopeId,
) -> Result<ScopeId, HookError> {
    let child = ctx.scopes.make_named(scope, symbol.runtime_name.clone());
    ctx.scopes.add_variable(
        child,
        ScopeVariable::new("bound", RuntimeType::String).introduced_by(symbol.id),
    );
    Ok(child)
}

#[test]
fn test_panicking_hook_does_not_abort_the_pass() {
    let mut catalog = Catalog::new();
    catalog.register_tag(TagDefinition::new("broken").with_augmenter(panicking_augmenter));
    catalog.register_tag(TagDefinition::new("binds").with_augmenter(binding_augmenter));
    let config = AnalysisConfig::default();
    let text = "{{ broken }}{{ binds }}{{ bound }}";
    let analysis = ScopeBuilder::new(&catalog, &EmptySchema, &config).analyze(text, 1);
    let symbols = analysis.symbols.symbols();

    assert_eq!(symbols[0].scope, Some(analysis.root_scope));
    assert!(analysis.scope_variable(symbols[2].id).is_some());
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_unknown_scope_from_hook_is_ignored() {
    let mut catalog = Catalog::new();
    catalog.register_tag(TagDefinition::new("lost").with_augmenter(
        |_ctx: &mut AugmentContext<'_>, _symbol: &Symbol, _scope: ScopeId| Ok(ScopeId(4096)),
    ));
    let config = AnalysisConfig::default();
    let analysis = ScopeBuilder::new(&catalog, &EmptySchema, &config).analyze("{{ lost }}", 1);
    assert_eq!(analysis.symbols.symbols()[0].scope, Some(analysis.root_scope));
}

// =============================================================================
// STRUCTURAL DIAGNOSTICS
// =============================================================================

#[rstest]
#[case("{{ if }}", vec![codes::UNCLOSED_TAG])]
#[case("{{ /posts }}", vec![codes::UNMATCHED_CLOSE])]
#[case("{{ if }}{{ /if }}", vec![])]
#[case("{{ if }}{{ posts }}{{ /posts }}{{ /if }}", vec![])]
fn test_structural_diagnostics(#[case] text: &str, #[case] expected: Vec<&str>) {
    let analysis = analyze(text);
    let found: Vec<_> = analysis
        .diagnostics
        .iter()
        .filter_map(|d| d.code.as_deref())
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_passes_are_distinct() {
    let first = analyze("{{ title }}");
    let second = analyze("{{ title }}");
    assert_ne!(first.id, second.id);
}
