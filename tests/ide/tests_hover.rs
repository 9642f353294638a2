//! Hover requests through the analysis host.

use std::sync::Arc;

use antlers::hir::HookError;
use antlers::ide::{HoverCategory, HoverHandler, HoverResult, SuggestionRequest};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::blog_fixtures::blog_registry;
use crate::helpers::host_helpers::{blog_host, caret, host_with};

fn hover_at(text: &str, needle: &str, delta: usize) -> Option<HoverResult> {
    let (host, id) = blog_host(text);
    let (line, col) = caret(text, needle, delta);
    host.analysis()
        .hover(id, 1, line, col, &CancellationToken::new())
        .expect("hover request succeeds")
}

fn answer(
    text: &'static str,
) -> impl Fn(&SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
    move |_: &SuggestionRequest<'_>| Ok(Some(HoverResult::new(text)))
}

fn decline(_: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
    Ok(None)
}

fn explode(_: &SuggestionRequest<'_>) -> Result<Option<HoverResult>, HookError> {
    panic!("hover handler bug")
}

// =============================================================================
// BUILT-IN HANDLERS
// =============================================================================

#[rstest]
#[case("{{ site_name | upper }}", "upper", 1, "upper(string) → string")]
#[case(r#"{{ partial src="x" }}"#, "partial", 2, "{{ partial }}")]
#[case("{{ site_name }}", "site_name", 2, "site_name: string")]
fn test_builtin_hover(
    #[case] text: &str,
    #[case] needle: &str,
    #[case] delta: usize,
    #[case] expected: &str,
) {
    let hover = hover_at(text, needle, delta).expect("hover");
    assert!(
        hover.contents.contains(expected),
        "{expected:?} not in {:?}",
        hover.contents
    );
}

#[test]
fn test_loop_field_hover_shows_provenance() {
    let text = "{{ collection:posts }}{{ posts }}{{ title | upper }}{{ /posts }}";
    let hover = hover_at(text, "title", 1).expect("hover");
    assert!(hover.contents.contains("Provided by `collection:posts`"));
    assert!(hover.contents.contains("The headline shown in listings."));
}

#[test]
fn test_interpolation_hover() {
    let text = r#"{{ partial src="cards/{slug}" }}"#;
    let hover = hover_at(text, "slug", 1).expect("hover");
    assert!(hover.contents.contains("slug: string"));
}

#[test]
fn test_no_hover_outside_tags() {
    assert!(hover_at("<h1>{{ title }}</h1>", "h1", 1).is_none());
    assert!(hover_at("{{ unknown_thing }}", "unknown", 2).is_none());
}

// =============================================================================
// DISPATCH ORDER
// =============================================================================

#[test]
fn test_first_result_wins() {
    let mut registry = blog_registry();
    registry.set_hover_handler(
        HoverCategory::Modifier,
        Some(Arc::new(decline) as Arc<dyn HoverHandler>),
    );
    registry.set_hover_handler(
        HoverCategory::Tag,
        Some(Arc::new(answer("custom tag")) as Arc<dyn HoverHandler>),
    );
    registry.add_hover_handler(HoverCategory::General, answer("fallback"));

    let text = "{{ partial }} {{ site_name }}";
    let (host, id) = host_with(registry, text);
    let analysis = host.analysis();
    let cancel = CancellationToken::new();

    let (line, col) = caret(text, "partial", 2);
    let hover = analysis.hover(id, 1, line, col, &cancel).unwrap();
    assert_eq!(hover.map(|h| h.contents), Some("custom tag".to_string()));

    let (line, col) = caret(text, "site_name", 2);
    let hover = analysis.hover(id, 1, line, col, &cancel).unwrap();
    assert_eq!(hover.map(|h| h.contents), Some("custom tag".to_string()));

    let mut registry = blog_registry();
    registry.add_hover_handler(HoverCategory::General, answer("fallback"));
    let (host, id) = host_with(registry, text);
    let (line, col) = caret(text, "} {", 1);
    let hover = host.analysis().hover(id, 1, line, col, &cancel).unwrap();
    assert_eq!(hover.map(|h| h.contents), Some("fallback".to_string()));
}

#[test]
fn test_panicking_hover_handler_is_skipped() {
    let mut registry = blog_registry();
    registry.set_hover_handler(
        HoverCategory::Modifier,
        Some(Arc::new(explode) as Arc<dyn HoverHandler>),
    );
    let text = "{{ site_name }}";
    let (host, id) = host_with(registry, text);
    let (line, col) = caret(text, "site_name", 2);
    let hover = host
        .analysis()
        .hover(id, 1, line, col, &CancellationToken::new())
        .unwrap();
    assert!(hover.is_some_and(|h| h.contents.contains("site_name")));
}
