//! Document lifecycle: versions, staleness and cancellation.

use antlers::hir::AnalysisConfig;
use antlers::ide::{AnalysisHost, DocumentId, RequestError};
use tokio_util::sync::CancellationToken;

use crate::helpers::blog_fixtures::blog_registry;
use crate::helpers::host_helpers::{PATH, blog_host, blog_schema, caret};

#[test]
fn test_requests_against_old_versions_are_stale() {
    let (host, id) = blog_host("{{ title }}");
    let analysis = host.analysis();
    host.set_document(PATH, "{{ site_name }}", 2);

    let cancel = CancellationToken::new();
    assert_eq!(
        analysis.hover(id, 1, 0, 4, &cancel),
        Err(RequestError::StaleVersion {
            requested: 1,
            current: 2
        })
    );
    let hover = analysis.hover(id, 2, 0, 4, &cancel).unwrap();
    assert!(hover.is_some_and(|h| h.contents.contains("site_name")));
}

#[test]
fn test_cancelled_requests_report_cancellation() {
    let (host, id) = blog_host("{{ title }}");
    let analysis = host.analysis();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(
        analysis.completions(id, 1, 0, 4, &cancel),
        Err(RequestError::Cancelled)
    );
    assert_eq!(analysis.hover(id, 1, 0, 4, &cancel), Err(RequestError::Cancelled));
    assert_eq!(analysis.diagnostics(id, 1, &cancel), Err(RequestError::Cancelled));
}

#[test]
fn test_child_token_cancellation() {
    let (host, id) = blog_host("{{ title }}");
    let parent = CancellationToken::new();
    let child = parent.child_token();
    parent.cancel();
    assert_eq!(
        host.analysis().diagnostics(id, 1, &child),
        Err(RequestError::Cancelled)
    );
}

#[test]
fn test_unknown_documents_and_positions() {
    let (host, id) = blog_host("{{ title }}\n");
    let analysis = host.analysis();
    let cancel = CancellationToken::new();

    assert_eq!(
        analysis.completions(DocumentId(42), 1, 0, 0, &cancel),
        Err(RequestError::UnknownDocument(DocumentId(42)))
    );
    assert_eq!(
        analysis.completions(id, 1, 7, 0, &cancel),
        Err(RequestError::PositionOutOfRange { line: 7, column: 0 })
    );
}

#[test]
fn test_documents_are_independent() {
    let host = AnalysisHost::new(blog_registry(), blog_schema(), AnalysisConfig::default());
    let loop_text = "{{ collection:posts }}{{ posts }}{{ date }}{{ /posts }}";
    let a = host.set_document("a.antlers.html", loop_text, 1);
    let b = host.set_document("b.antlers.html", "{{ date }}", 1);

    let analysis = host.analysis();
    let cancel = CancellationToken::new();
    let (line, col) = caret(loop_text, "date", 1);
    assert!(analysis.hover(a, 1, line, col, &cancel).unwrap().is_some());
    assert!(analysis.hover(b, 1, 0, 4, &cancel).unwrap().is_none());

    assert!(host.remove_document("a.antlers.html"));
    assert_eq!(
        analysis.hover(a, 1, line, col, &cancel),
        Err(RequestError::UnknownDocument(a))
    );
}

#[test]
fn test_scope_at_follows_loop_bodies() {
    let text = "{{ collection:posts }}{{ posts }}\n  {{ title }}\n{{ /posts }}\n";
    let (host, id) = blog_host(text);
    let analysis = host.analysis();
    let cancel = CancellationToken::new();
    let document = host.document(id).expect("published");

    let inside = analysis.scope_at(id, 1, 1, 5, &cancel).unwrap();
    let after = analysis.scope_at(id, 1, 3, 0, &cancel).unwrap();
    assert_ne!(inside, document.root_scope);
    assert_eq!(after, document.root_scope);
}
