//! Where a cursor lands: positions, clamping and cursors with no completion
//! context.

use rstest::rstest;
use semcc::base::Annotated;
use semcc::ide::{
    CollectingSink, CompletionOptions, CompletionQuery, anchor, complete, run_completion,
};
use semcc::{CompletionError, DataModel, NoContextReason, SourcePosition};

fn no_context(annotated: &str) -> Option<NoContextReason> {
    let query = CompletionQuery::from_annotated(annotated).expect("exactly one cursor marker");
    match complete(&query, &CompletionOptions::default()) {
        Ok(_) => None,
        Err(CompletionError::NoContext { reason, .. }) => Some(reason),
    }
}

// ============================================================================
// COMMENTS AND LITERALS
// ============================================================================

#[rstest]
#[case("int x; // x = ^")]
#[case("int x; /* x = ^ */")]
#[case("int x; /* never closed ^")]
#[case("namespace a {\n  // ^\n}")]
#[case("#define X ^")]
fn test_cursor_in_comment_has_no_context(#[case] code: &str) {
    assert_eq!(no_context(code), Some(NoContextReason::InsideComment));
}

#[rstest]
#[case(r#"const char *s = "a^b";"#)]
#[case(r#"const char *s = "open ^"#)]
#[case("char c = 'x^';")]
fn test_cursor_in_literal_has_no_context(#[case] code: &str) {
    assert_eq!(no_context(code), Some(NoContextReason::InsideLiteral));
}

#[rstest]
#[case("int x; /* c */ x = ^")]
#[case("int x; x = ^ // trailing")]
#[case(r#"const char *s = "ab"; s = ^"#)]
#[case("int x;\n// line\nx = ^")]
fn test_cursor_next_to_comment_or_literal_completes(#[case] code: &str) {
    assert_eq!(no_context(code), None);
}

// ============================================================================
// POSITIONS
// ============================================================================

#[test]
fn test_position_is_one_based() {
    let query = CompletionQuery::from_annotated("namespace a {\n\tint y = ^0;\n}").unwrap();
    let result = complete(&query, &CompletionOptions::default()).unwrap();
    assert_eq!(result.position, SourcePosition::new(2, 10));
    assert_eq!(result.position.to_string(), "2:10");
}

#[test]
fn test_error_reports_position() {
    let query = CompletionQuery::from_annotated("int a;\nint b; // ^").unwrap();
    let error = complete(&query, &CompletionOptions::default()).unwrap_err();
    assert_eq!(error.position(), SourcePosition::new(2, 11));
    assert_eq!(
        error.to_string(),
        "no completion context at 2:11: cursor is inside a comment"
    );
}

#[test]
fn test_offset_past_end_completes_at_end() {
    let text = "namespace n { int v; v = ";
    let result = complete(
        &CompletionQuery::new(text, text.len() + 42),
        &CompletionOptions::default(),
    )
    .unwrap();
    assert_eq!(result.position, SourcePosition::new(1, text.len() as u32 + 1));
    assert_eq!(result.preferred_type_name(), "int");
    assert_eq!(result.sorted_namespaces(), vec!["n"]);
}

#[test]
fn test_cursor_at_start_of_empty_text() {
    let result = complete(&CompletionQuery::new("", 0), &CompletionOptions::default()).unwrap();
    assert_eq!(result.position, SourcePosition::new(1, 1));
    assert!(result.visited_namespaces.is_empty());
    assert!(result.preferred_type.is_unknown());
}

#[test]
fn test_anchor_exposes_scope_tree() {
    let fixture = Annotated::parse("namespace a { namespace { } namespace b { ^ } }");
    let anchored = anchor(&fixture.code, fixture.point().unwrap(), DataModel::default()).unwrap();
    assert_eq!(anchored.tree.display_name(anchored.site.scope), "a::b");
    assert!(anchored.tree.find("a::(anonymous)").is_some());
    assert!(anchored.site.qualifier.is_none());
}

// ============================================================================
// BROKEN INPUT
// ============================================================================

#[rstest]
#[case("namespace a { int x = ; } namespace b { ^ }", &["b"])]
#[case("} } namespace c { ^", &["c"])]
#[case("namespace d { @@@ ; void f( { ^", &["d"])]
#[case("namespace e { int f() { return ( ; } ^ }", &["e"])]
fn test_garbage_before_cursor_still_anchors(#[case] code: &str, #[case] expected: &[&str]) {
    let query = CompletionQuery::from_annotated(code).unwrap();
    let result = complete(&query, &CompletionOptions::default()).unwrap();
    assert_eq!(result.sorted_namespaces(), expected);
}

#[rstest]
#[case("void f(int x) { x = ", "(")]
#[case("", "namespace a {")]
#[case("void f() { ", "{")]
#[case("void f() { ", "if (1) ")]
#[case("int y = ", "-")]
#[case("int y = ", "(int)")]
#[case("int y = ", "y = ")]
#[case("int y = ", "y ? 1 : ")]
#[case("", "template <class T> ")]
#[case("", "extern \"C\" ")]
#[case("", "struct S { ")]
#[case("namespace ", "a::")]
fn test_deeply_nested_input_returns(#[case] prefix: &str, #[case] unit: &str) {
    let text = format!("{prefix}{}", unit.repeat(100_000));
    let query = CompletionQuery::new(text.as_str(), text.len());
    let result = complete(&query, &CompletionOptions::default());
    assert!(
        matches!(result, Ok(_) | Err(CompletionError::NoContext { .. })),
        "unexpected outcome for {unit:?} nesting: {result:?}"
    );
}

#[test]
fn test_parsing_resumes_after_deep_nesting() {
    let text = format!(
        "void f(long x) {{ x = {}0{}; }} namespace n {{ long v; v = ^ }}",
        "(".repeat(10_000),
        ")".repeat(10_000),
    );
    let result = complete(
        &CompletionQuery::from_annotated(&text).unwrap(),
        &CompletionOptions::default(),
    )
    .unwrap();
    assert_eq!(result.sorted_namespaces(), vec!["n"]);
    assert_eq!(result.preferred_type_name(), "long");
}

// ============================================================================
// SINKS
// ============================================================================

#[test]
fn test_sink_receives_results_and_failures_in_order() {
    let options = CompletionOptions::default();
    let mut sink = CollectingSink::default();
    for code in ["int i; i = ^", "// ^", r#""^""#, "namespace q { ^ }"] {
        run_completion(&CompletionQuery::from_annotated(code).unwrap(), &options, &mut sink);
    }

    let types: Vec<String> = sink.results.iter().map(|r| r.preferred_type_name()).collect();
    assert_eq!(types, vec!["int", "NULL TYPE"]);
    assert_eq!(sink.results[1].sorted_namespaces(), vec!["q"]);

    let reasons: Vec<NoContextReason> = sink
        .errors
        .iter()
        .map(|CompletionError::NoContext { reason, .. }| *reason)
        .collect();
    assert_eq!(
        reasons,
        vec![NoContextReason::InsideComment, NoContextReason::InsideLiteral]
    );
}
