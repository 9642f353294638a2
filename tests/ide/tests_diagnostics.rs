//! Diagnostics requests: structural issues, built-in lint and custom handlers.

use antlers::hir::{AnalysisConfig, Diagnostic, HookError, codes};
use antlers::ide::{AnalysisHost, SymbolRequest};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::blog_fixtures::blog_registry;
use crate::helpers::host_helpers::{PATH, blog_host, blog_schema};

const TEMPLATE: &str = r#"{{ if }}
{{ collection:posts }}{{ posts | length | upper }}
{{ partial src="card" colour="red" }}
{{ /nothing }}"#;

fn codes_of(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().filter_map(|d| d.code.as_deref()).collect()
}

fn flag_partial(request: &SymbolRequest<'_>) -> Result<Vec<Diagnostic>, HookError> {
    let symbol = request.symbol;
    if symbol.adjusted_name != "partial" {
        return Ok(Vec::new());
    }
    Ok(vec![Diagnostic::info(symbol.span, "partial seen").with_code("X0001")])
}

fn always_fails(_: &SymbolRequest<'_>) -> Result<Vec<Diagnostic>, HookError> {
    Err(HookError::new("handler unavailable"))
}

#[test]
fn test_structural_and_lint_diagnostics_are_unioned() {
    let (host, id) = blog_host(TEMPLATE);
    let found = host
        .analysis()
        .diagnostics(id, 1, &CancellationToken::new())
        .unwrap();
    assert_eq!(
        codes_of(&found),
        vec![
            codes::UNCLOSED_TAG,
            codes::MODIFIER_TYPE_MISMATCH,
            codes::UNKNOWN_PARAMETER,
            codes::UNMATCHED_CLOSE,
        ]
    );
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(usize::MAX)]
fn test_custom_handlers_join_in_any_mode(#[case] threshold: usize) {
    let mut registry = blog_registry();
    registry.register_diagnostics_handler(always_fails);
    registry.register_diagnostics_handler(flag_partial);
    let config = AnalysisConfig {
        parallel_diagnostics_threshold: threshold,
        ..AnalysisConfig::default()
    };
    let host = AnalysisHost::new(registry, blog_schema(), config);
    let id = host.set_document(PATH, TEMPLATE, 1);

    let found = host
        .analysis()
        .diagnostics(id, 1, &CancellationToken::new())
        .unwrap();
    assert_eq!(
        codes_of(&found),
        vec![
            codes::UNCLOSED_TAG,
            codes::MODIFIER_TYPE_MISMATCH,
            "X0001",
            codes::UNKNOWN_PARAMETER,
            codes::UNMATCHED_CLOSE,
        ]
    );
}

#[test]
fn test_builtin_lint_can_be_disabled() {
    let config = AnalysisConfig {
        builtin_diagnostics: false,
        ..AnalysisConfig::default()
    };
    let host = AnalysisHost::new(blog_registry(), blog_schema(), config);
    let id = host.set_document(PATH, TEMPLATE, 1);
    let found = host
        .analysis()
        .diagnostics(id, 1, &CancellationToken::new())
        .unwrap();
    assert_eq!(codes_of(&found), vec![codes::UNCLOSED_TAG, codes::UNMATCHED_CLOSE]);
}
