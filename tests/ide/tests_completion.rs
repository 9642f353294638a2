//! Completion requests through the analysis host.

use std::sync::Arc;

use antlers::hir::{HookError, TagDefinition};
use antlers::ide::{
    CompletionCategory, CompletionHandler, CompletionItem, CompletionKind, CompletionResponse,
    SuggestionRequest,
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::blog_fixtures::blog_registry;
use crate::helpers::host_helpers::{blog_host, caret, host_with, labels};

fn complete_at(text: &str, needle: &str, delta: usize) -> CompletionResponse {
    let (host, id) = blog_host(text);
    let (line, col) = caret(text, needle, delta);
    host.analysis()
        .completions(id, 1, line, col, &CancellationToken::new())
        .expect("completion request succeeds")
}

// =============================================================================
// BUILT-IN HANDLERS
// =============================================================================

#[test]
fn test_modifiers_after_pipe_are_exclusive() {
    let response = complete_at("{{ site_name | }}", "| ", 2);
    assert!(response.is_exclusive_result);
    assert!(response.items.iter().all(|i| i.kind == CompletionKind::Modifier));
    // `site_name` is a string, so string modifiers rank first.
    assert_eq!(&labels(&response)[..2], &["lower", "upper"]);
    assert!(labels(&response).contains(&"length"));
}

#[test]
fn test_members_after_dot_are_exclusive() {
    let text = "{{ collection:posts }}{{ posts. }}";
    let response = complete_at(text, "posts. ", 6);
    assert!(response.is_exclusive_result);
    assert_eq!(labels(&response), vec!["date", "tags", "title"]);
}

#[test]
fn test_head_offers_tags_and_variables() {
    let text = "{{ collection:posts }}\n{{ p }}";
    let response = complete_at(text, "p }}", 1);
    let found = labels(&response);
    assert!(!response.is_exclusive_result);
    for expected in ["partial", "collection", "posts", "site_name", "title"] {
        assert!(found.contains(&expected), "missing {expected} in {found:?}");
    }
}

#[test]
fn test_loop_body_offers_entry_fields() {
    let text = "{{ collection:posts }}{{ posts }}{{  }}{{ /posts }}";
    let response = complete_at(text, "{{  }}", 3);
    let found = labels(&response);
    for expected in ["date", "count", "first", "site_name"] {
        assert!(found.contains(&expected), "missing {expected} in {found:?}");
    }
}

#[rstest]
#[case(r#"{{ partial  }}"#, "  }}", 1, vec!["src", "cache"])]
#[case(r#"{{ partial src="card"  }}"#, "  }}", 1, vec!["cache"])]
#[case(r#"{{ partial src="card" cache="true"  }}"#, "  }}", 1, vec![])]
fn test_unused_parameters(
    #[case] text: &str,
    #[case] needle: &str,
    #[case] delta: usize,
    #[case] expected: Vec<&str>,
) {
    let response = complete_at(text, needle, delta);
    assert_eq!(labels(&response), expected);
}

#[test]
fn test_required_parameter_inserts_assignment() {
    let response = complete_at("{{ partial  }}", "  }}", 1);
    let src = &response.items[0];
    assert_eq!(src.label.as_ref(), "src");
    assert_eq!(src.insert_text.as_deref(), Some(r#"src="""#));
}

// =============================================================================
// DISPATCH ORDER
// =============================================================================

fn fixed(
    label: &'static str,
    exclusive: bool,
) -> impl Fn(&SuggestionRequest<'_>) -> Result<CompletionResponse, HookError> {
    move |_: &SuggestionRequest<'_>| {
        let items = vec![CompletionItem::new(label, CompletionKind::Variable)];
        Ok(if exclusive {
            CompletionResponse::exclusive(items)
        } else {
            CompletionResponse::new(items)
        })
    }
}

fn panics(_: &SuggestionRequest<'_>) -> Result<CompletionResponse, HookError> {
    panic!("completion handler bug")
}

#[test]
fn test_exclusive_response_stops_later_categories() {
    let mut registry = blog_registry();
    registry.add_completion_handler(CompletionCategory::Parameter, fixed("stop", true));
    registry.add_completion_handler(CompletionCategory::General, fixed("late", false));

    let text = "{{ p }}";
    let (host, id) = host_with(registry, text);
    let (line, col) = caret(text, "p }}", 1);
    let response = host
        .analysis()
        .completions(id, 1, line, col, &CancellationToken::new())
        .unwrap();

    let found = labels(&response);
    assert!(response.is_exclusive_result);
    assert!(found.contains(&"stop"));
    assert!(!found.contains(&"late"));
    assert!(!found.contains(&"partial"));
}

#[test]
fn test_tag_providers_run_before_parameter_handlers() {
    let mut registry = blog_registry();
    registry.register_tag(TagDefinition::new("nav"));
    registry.add_tag_completion_provider(
        "nav",
        |_: &SuggestionRequest<'_>| -> Result<Vec<CompletionItem>, HookError> {
            Ok(vec![CompletionItem::new("from", CompletionKind::Parameter)])
        },
    );
    registry.set_completion_handler(
        CompletionCategory::Parameter,
        Some(Arc::new(fixed("never", true)) as Arc<dyn CompletionHandler>),
    );

    let text = "{{ nav  }}";
    let (host, id) = host_with(registry, text);
    let (line, col) = caret(text, "  }}", 1);
    let response = host
        .analysis()
        .completions(id, 1, line, col, &CancellationToken::new())
        .unwrap();
    assert_eq!(labels(&response), vec!["from", "never"]);
}

#[test]
fn test_failing_handler_contributes_nothing() {
    let mut registry = blog_registry();
    registry.set_completion_handler(
        CompletionCategory::Modifier,
        Some(Arc::new(panics) as Arc<dyn CompletionHandler>),
    );
    registry.add_completion_handler(CompletionCategory::General, fixed("still_here", false));

    let text = "{{ title }}";
    let (host, id) = host_with(registry, text);
    let (line, col) = caret(text, "title", 2);
    let response = host
        .analysis()
        .completions(id, 1, line, col, &CancellationToken::new())
        .unwrap();
    assert!(labels(&response).contains(&"still_here"));
}

#[test]
fn test_cleared_categories_offer_nothing() {
    let mut registry = blog_registry();
    for category in CompletionCategory::ALL {
        registry.set_completion_handler(category, None);
    }
    let text = "{{ title }}";
    let (host, id) = host_with(registry, text);
    let (line, col) = caret(text, "title", 2);
    let response = host
        .analysis()
        .completions(id, 1, line, col, &CancellationToken::new())
        .unwrap();
    assert!(response.is_empty());
}
