//! Type inference through modifier chains, and the lint checks built on it.

use antlers::hir::{RuntimeType, check_symbol, codes};
use antlers::syntax::ModifierStyle;
use rstest::rstest;

use crate::helpers::blog_fixtures::blog_catalog;
use crate::helpers::host_helpers::analyze;

/// Manifest type of the last symbol in `text`.
fn manifest_type(text: &str) -> RuntimeType {
    let analysis = analyze(text);
    analysis
        .symbols
        .iter()
        .rev()
        .find(|s| !s.is_closing_tag && !s.is_interpolation)
        .map(|s| s.manifest_type.clone())
        .unwrap_or_default()
}

#[rstest]
#[case("{{ site_name }}", RuntimeType::String)]
#[case("{{ site_name | upper }}", RuntimeType::String)]
#[case("{{ collection:posts }}{{ posts }}", RuntimeType::Array)]
#[case("{{ collection:posts }}{{ posts | length }}", RuntimeType::Number)]
#[case("{{ collection:posts }}{{ posts | length | upper }}", RuntimeType::String)]
#[case("{{ collection:posts }}{{ posts | trim }}", RuntimeType::Array)]
#[case("{{ site_name | no_such_modifier }}", RuntimeType::String)]
#[case(r#"{{ site_name upper="true" }}"#, RuntimeType::String)]
#[case("{{ nothing | upper }}", RuntimeType::String)]
#[case("{{ nothing }}", RuntimeType::Unknown)]
fn test_manifest_type_follows_chain(#[case] text: &str, #[case] expected: RuntimeType) {
    assert_eq!(manifest_type(text), expected);
}

#[test]
fn test_chain_links_are_annotated() {
    let analysis = analyze("{{ collection:posts }}{{ posts | length | upper }}");
    let symbol = &analysis.symbols.symbols()[1];
    let links: Vec<_> = symbol
        .modifiers
        .records()
        .iter()
        .map(|r| (r.name.as_str(), r.input_type.clone(), r.output_type.clone()))
        .collect();
    assert_eq!(
        links,
        vec![
            ("length", RuntimeType::Array, RuntimeType::Number),
            ("upper", RuntimeType::Number, RuntimeType::String),
        ]
    );
    assert_eq!(symbol.source_type, RuntimeType::Array);
}

#[test]
fn test_parameter_modifiers_are_not_extracted_from_tags() {
    let analysis = analyze(r#"{{ partial src="card" upper="true" }}{{ title upper="true" }}"#);
    let symbols = analysis.symbols.symbols();

    assert!(symbols[0].modifiers.is_empty());
    assert!(symbols[0].parameters.iter().all(|p| !p.is_modifier));

    let record = &symbols[1].modifiers.records()[0];
    assert_eq!(record.style, ModifierStyle::Parameter);
    assert!(record.has_registered_modifier);
    assert!(symbols[1].parameters[0].is_modifier);
}

#[rstest]
#[case("{{ collection:posts }}{{ posts | length | upper }}", codes::MODIFIER_TYPE_MISMATCH)]
#[case("{{ site_name | shout }}", codes::UNKNOWN_MODIFIER)]
#[case(r#"{{ site_name | upper lower="true" }}"#, codes::MIXED_MODIFIER_STYLES)]
#[case(r#"{{ partial src="card" colour="red" }}"#, codes::UNKNOWN_PARAMETER)]
fn test_lint_codes(#[case] text: &str, #[case] code: &str) {
    let catalog = blog_catalog();
    let analysis = analyze(text);
    let found: Vec<_> = analysis
        .symbols
        .iter()
        .flat_map(|symbol| check_symbol(&catalog, symbol))
        .filter_map(|d| d.code.map(|c| c.to_string()))
        .collect();
    assert_eq!(found, vec![code.to_string()]);
}

#[test]
fn test_clean_template_has_no_lint() {
    let catalog = blog_catalog();
    let text = r#"{{ collection:posts }}{{ posts }}{{ title | upper }}{{ /posts }}{{ partial src="x" }}"#;
    let analysis = analyze(text);
    assert!(analysis
        .symbols
        .iter()
        .all(|symbol| check_symbol(&catalog, symbol).is_empty()));
}
