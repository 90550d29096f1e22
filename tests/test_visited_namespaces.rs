//! Visited namespaces for qualified (`ns::^`) and unqualified (`^`) completion,
//! resolved from source text.

use rstest::rstest;
use semcc::ide::{CompletionOptions, CompletionQuery, CompletionResult, complete};

fn run(annotated: &str) -> CompletionResult {
    let query = CompletionQuery::from_annotated(annotated).expect("exactly one cursor marker");
    complete(&query, &CompletionOptions::default()).expect("cursor has a completion context")
}

fn visited_sorted(annotated: &str) -> Vec<String> {
    run(annotated)
        .sorted_namespaces()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn visited_in_order(annotated: &str) -> Vec<String> {
    run(annotated)
        .visited_namespaces
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ============================================================================
// QUALIFIED COMPLETION
// ============================================================================

#[test]
fn test_qualified_follows_inline_and_anonymous_directives() {
    let visited = visited_sorted(
        r#"
     namespace ns1 {}
     namespace ns2 {}
     namespace ns3 {}
     namespace ns3 { namespace nns3 {} }

     namespace foo {
     using namespace ns1;
     namespace ns4 {} // not visited
     namespace { using namespace ns2; }
     inline namespace bar { using namespace ns3::nns3; }
     } // foo
     namespace ns { foo::^ }
  "#,
    );
    assert_eq!(
        visited,
        vec!["foo", "foo::(anonymous)", "ns1", "ns2", "ns3::nns3"]
    );
}

#[test]
fn test_qualified_with_unknown_namespace_is_empty() {
    let result = run(
        r#"
     namespace ns { foo::^ }
  "#,
    );
    assert!(result.visited_namespaces.is_empty());
}

#[test]
fn test_qualified_through_alias() {
    let visited = visited_sorted(
        r#"
     namespace impl { namespace detail {} }
     namespace pub_ = impl;
     namespace other { using namespace impl::detail; }
     namespace impl { using namespace ::other; }
     void f() { pub_::^ }
  "#,
    );
    assert_eq!(visited, vec!["impl", "impl::detail", "other"]);
}

#[test]
fn test_qualified_cyclic_directives_terminate() {
    let visited = visited_sorted(
        r#"
     namespace a {}
     namespace b { using namespace a; }
     namespace a { using namespace b; }
     int x = a::^
  "#,
    );
    assert_eq!(visited, vec!["a", "b"]);
}

#[test]
fn test_qualified_transitive_directives() {
    let visited = visited_sorted(
        r#"
     namespace d {}
     namespace c { namespace { using namespace d; } }
     namespace b { using namespace c; }
     namespace a { using namespace b; }
     void f() { ::a::^ }
  "#,
    );
    assert_eq!(visited, vec!["a", "b", "c", "c::(anonymous)", "d"]);
}

#[test]
fn test_qualified_nested_definition() {
    let visited = visited_sorted(
        r#"
     namespace outer::inner { }
     namespace outer { void g() { inner::^ } }
  "#,
    );
    assert_eq!(visited, vec!["outer::inner"]);
}

#[test]
fn test_query_qualifier_replaces_text_qualifier() {
    let query = CompletionQuery::from_annotated(
        r#"
     namespace a {}
     namespace b { using namespace a; }
     void f() { b::^ }
  "#,
    )
    .unwrap()
    .with_qualifier("a::");
    let result = complete(&query, &CompletionOptions::default()).unwrap();
    assert_eq!(result.sorted_namespaces(), vec!["a"]);
}

#[rstest]
#[case("a::1")]
#[case("a:::b")]
#[case("a::::")]
fn test_malformed_query_qualifier_is_empty(#[case] qualifier: &str) {
    let query = CompletionQuery::from_annotated("namespace a {} void f() { ^ }")
        .unwrap()
        .with_qualifier(qualifier);
    let result = complete(&query, &CompletionOptions::default()).unwrap();
    assert!(result.visited_namespaces.is_empty());
}

// ============================================================================
// UNQUALIFIED COMPLETION
// ============================================================================

#[test]
fn test_unqualified_in_parameter_list() {
    let visited = visited_sorted(
        r#"
    namespace n1 {
    namespace n2 {
      void f(^) {}
    }
    }
  "#,
    );
    assert_eq!(visited, vec!["n1", "n1::n2"]);
}

#[rstest]
#[case("namespace a { namespace b { int x = ^ } }", &["a::b", "a"])]
#[case("namespace a { namespace { void f() { ^ } } }", &["a"])]
#[case("namespace a { inline namespace v1 { void f() { ^ } } }", &["a::v1", "a"])]
#[case("namespace a::b::c { struct S { void m() { ^ } }; }", &["a::b::c", "a::b", "a"])]
#[case("void f() { ^ }", &[])]
fn test_unqualified_is_innermost_first(#[case] code: &str, #[case] expected: &[&str]) {
    assert_eq!(visited_in_order(code), expected);
}

#[test]
fn test_unqualified_ignores_using_directives() {
    let visited = visited_in_order(
        r#"
    namespace lib {}
    namespace app {
      using namespace lib;
      void f() { ^ }
    }
  "#,
    );
    assert_eq!(visited, vec!["app"]);
}

#[test]
fn test_out_of_line_definition_completes_in_its_namespace() {
    let visited = visited_in_order(
        r#"
    namespace n { void f(); }
    void n::f() { ^ }
  "#,
    );
    assert_eq!(visited, vec!["n"]);
}
