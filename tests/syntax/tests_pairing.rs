//! Open/close pairing over whole documents.

use antlers::LineIndex;
use antlers::syntax::{
    CloseRequirement, SymbolId, SymbolTable, SyntaxIssueKind, pair_symbols, scan_regions,
};
use rstest::rstest;

fn paired(text: &str, requirement: impl Fn(&str) -> CloseRequirement) -> SymbolTable {
    let mut table = SymbolTable::from_tokens(scan_regions(text), &LineIndex::new(text));
    pair_symbols(&mut table, |symbol| requirement(&symbol.adjusted_name));
    table
}

fn optional(_: &str) -> CloseRequirement {
    CloseRequirement::Optional
}

fn closers(table: &SymbolTable) -> Vec<Option<u32>> {
    table.iter().map(|s| s.is_closed_by.map(|c| c.0)).collect()
}

#[rstest]
#[case("{{ a }}{{ /a }}", vec![Some(1), None])]
#[case("{{ a }}{{ a }}{{ /a }}{{ /a }}", vec![Some(3), Some(2), None, None])]
#[case("{{ a }}{{ b }}{{ /b }}{{ /a }}", vec![Some(3), Some(2), None, None])]
#[case("{{ a }}{{ b }}{{ /a }}", vec![Some(2), None, None])]
#[case("{{ a }}{{ b /}}{{ /b }}", vec![None, None, None])]
fn test_nearest_opener_is_closed(#[case] text: &str, #[case] expected: Vec<Option<u32>>) {
    assert_eq!(closers(&paired(text, optional)), expected);
}

#[test]
fn test_closer_matches_tag_name() {
    let table = paired("{{ collection:posts }}{{ /collection }}", optional);
    let closer = &table.symbols()[1];
    assert_eq!(closer.belongs_to, Some(SymbolId(0)));
    assert_eq!(closer.runtime_name, "collection:posts");
    assert_eq!(table.opener_of(SymbolId(1)).map(|s| s.id), Some(SymbolId(0)));
    assert_eq!(table.closer_of(SymbolId(0)).map(|s| s.id), Some(SymbolId(1)));
}

#[test]
fn test_required_tags_skipped_by_a_closer_are_unclosed() {
    let required = |name: &str| match name {
        "if" => CloseRequirement::Required,
        _ => CloseRequirement::Optional,
    };
    let table = paired("{{ a }}{{ if }}{{ /a }}", required);
    let kinds: Vec<_> = table.issues().iter().map(|i| (i.kind, i.symbol)).collect();
    assert_eq!(kinds, vec![(SyntaxIssueKind::Unclosed, Some(SymbolId(1)))]);
}

#[test]
fn test_never_pairing_names_are_ignored() {
    let never = |name: &str| match name {
        "yield" => CloseRequirement::Never,
        _ => CloseRequirement::Optional,
    };
    let table = paired("{{ yield }}{{ /yield }}", never);
    assert!(table.symbols()[0].is_closed_by.is_none());
    assert_eq!(table.issues()[0].kind, SyntaxIssueKind::UnmatchedClose);
}

#[test]
fn test_pairing_ignores_interpolations_and_comments() {
    let table = paired(r#"{{ a src="{a}" }}{{# {{ /a }} #}}{{ /a }}"#, optional);
    assert_eq!(table.symbols()[0].is_closed_by, Some(SymbolId(3)));
    assert!(table.issues().is_empty());
}
