//! Symbols extracted from `{{ ... }}` regions.

use antlers::LineIndex;
use antlers::syntax::{ModifierStyle, RawToken, SymbolId, SymbolTable, scan_regions};
use rstest::rstest;

fn table(text: &str) -> SymbolTable {
    SymbolTable::from_tokens(scan_regions(text), &LineIndex::new(text))
}

#[rstest]
#[case("{{ title }}", "title", "title", None)]
#[case("{{ collection:posts }}", "collection:posts", "collection", Some("posts"))]
#[case("{{ nav:main: }}", "nav:main", "nav", Some("main"))]
#[case("{{ page.author.name }}", "page.author.name", "page.author.name", None)]
#[case("{{ /collection:posts }}", "collection:posts", "collection", Some("posts"))]
fn test_head_names(
    #[case] text: &str,
    #[case] adjusted: &str,
    #[case] tag: &str,
    #[case] method: Option<&str>,
) {
    let table = table(text);
    let symbol = &table.symbols()[0];
    assert_eq!(symbol.adjusted_name, adjusted);
    assert_eq!(symbol.tag_name, tag);
    assert_eq!(symbol.method_name.as_deref(), method);
}

#[test]
fn test_regions_span_the_braces_across_lines() {
    let text = "<p>\n{{ partial\n  src=\"card\" }}\n</p>";
    let tokens = scan_regions(text);
    assert_eq!(tokens.len(), 1);
    let span = tokens[0].span;
    let region = &text[span.start_offset() as usize..span.end_offset() as usize];
    assert_eq!(region, "{{ partial\n  src=\"card\" }}");
    assert_eq!((span.start_line, span.end_line), (1, 2));
}

#[test]
fn test_parameters_and_interpolations() {
    let text = r#"{{ partial src="cards/{slug}-{id}" :data="entry" }}"#;
    let table = table(text);
    let partial = &table.symbols()[0];

    let names: Vec<_> = partial.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["src", "data"]);
    assert!(!partial.parameters[0].is_variable_reference);
    assert!(partial.parameters[1].is_variable_reference);
    assert_eq!(partial.parameters[0].value, "cards/{slug}-{id}");

    let texts: Vec<_> = partial.interpolations().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["slug", "id"]);
    for interpolation in partial.interpolations() {
        let symbol = table.get(interpolation.symbol).expect("interpolation symbol");
        assert!(symbol.is_interpolation);
        assert_eq!(symbol.interpolation_parent, Some(SymbolId(0)));
        assert_eq!(
            &text[symbol.span.start_offset() as usize..symbol.span.end_offset() as usize],
            format!("{{{}}}", interpolation.text)
        );
    }
}

#[test]
fn test_shorthand_modifier_arguments() {
    let table = table("{{ summary | truncate:120:'…' | upper }}");
    let records = table.symbols()[0].modifiers.records();
    let parsed: Vec<_> = records
        .iter()
        .map(|r| {
            let args: Vec<_> = r.args.iter().map(|a| a.text.as_str()).collect();
            (r.name.as_str(), r.style, args)
        })
        .collect();
    assert_eq!(
        parsed,
        vec![
            ("truncate", ModifierStyle::Shorthand, vec!["120", "…"]),
            ("upper", ModifierStyle::Shorthand, vec![]),
        ]
    );
}

#[rstest]
#[case(r#"{{ partial src= }}"#)]
#[case(r#"{{ partial src="card }}"#)]
fn test_malformed_parameters_are_reported(#[case] text: &str) {
    let table = table(text);
    assert_eq!(table.issues().len(), 1);
    assert_eq!(table.issues()[0].symbol, Some(SymbolId(0)));
    assert!(table.symbols()[0].parameters.is_empty());
}

#[test]
fn test_tokens_from_an_upstream_parser() {
    let text = "ab{{ x }}";
    let token = RawToken::new(" x ", 2, 0, 0);
    let table = SymbolTable::from_tokens([token], &LineIndex::new(text));
    let symbol = &table.symbols()[0];
    assert_eq!(symbol.adjusted_name, "x");
    assert_eq!((symbol.span.start_offset(), symbol.span.end_offset()), (2, 9));
}

#[test]
fn test_self_closing_and_comment_regions() {
    let table = table("{{ partial:card /}}{{# note #}}");
    assert!(table.symbols()[0].is_self_closing);
    assert!(!table.symbols()[0].can_open());
    assert!(table.symbols()[1].is_comment);
}
