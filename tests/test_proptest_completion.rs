//! Property-based tests for completion on arbitrary input.
//!
//! Texts are generated from a C++-flavoured fragment alphabet so that most of
//! them get past the lexer and exercise the recovering parser: unbalanced
//! braces, dangling operators, half-written namespaces and stray comments.
//! Plain arbitrary strings cover the lexer itself.
#![cfg(feature = "proptest")]

use proptest::prelude::*;
use semcc::ide::{CompletionOptions, CompletionQuery, complete};
use semcc::{CompletionError, DataModel, LineIndex, SourcePosition, TextSize};

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Fragments that commonly appear around a completion point.
fn arb_fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "namespace ", "inline ", "using ", "class ", "struct ", "enum ", "typedef ",
        "int ", "long ", "unsigned ", "double ", "bool ", "void ", "auto ", "template ",
        "return ", "if ", "for ", "while ", "sizeof ",
        "a", "b", "ns", "Cls", "x", "1", "2.5f", "'c'", "\"s\"", "\"open",
        "{", "}", "(", ")", "[", "]", "<", ">", ";", ",", ":", "::", "?",
        "=", "+=", "<<=", "+", "-", "*", "&", "&&", "||", "|", "<<", ">>", "==",
        "!", "~", ".", "->", " ", "\n", "// c\n", "/* c */", "/*", "#x\n",
    ])
}

fn arb_source() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..40).prop_map(|parts| parts.concat())
}

fn arb_data_model() -> impl Strategy<Value = DataModel> {
    prop_oneof![
        Just(DataModel::Lp64),
        Just(DataModel::Llp64),
        Just(DataModel::Ilp32),
    ]
}

fn options(model: DataModel) -> CompletionOptions {
    CompletionOptions::default().with_data_model(model)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any offset into any fragment soup yields a result or a no-context error.
    #[test]
    fn completion_never_panics(text in arb_source(), offset in 0usize..600, model in arb_data_model()) {
        let _ = complete(&CompletionQuery::new(text, offset), &options(model));
    }

    /// Arbitrary unicode, including offsets inside multi-byte characters.
    #[test]
    fn completion_never_panics_on_arbitrary_text(text in "\\PC{0,80}", offset in 0usize..400) {
        let _ = complete(&CompletionQuery::new(text, offset), &CompletionOptions::default());
    }

    /// Reported positions agree with the line index of the clamped offset.
    #[test]
    fn position_matches_clamped_offset(text in arb_source(), offset in 0usize..600) {
        let clamped = offset.min(text.len());
        let expected = LineIndex::new(&text).position(TextSize::from(clamped as u32));
        prop_assert_eq!(expected, SourcePosition::of_offset(&text, offset));

        let position = match complete(&CompletionQuery::new(text, offset), &CompletionOptions::default()) {
            Ok(result) => result.position,
            Err(error) => error.position(),
        };
        prop_assert_eq!(position, expected);
    }

    /// Completion is a pure function of its inputs.
    #[test]
    fn completion_is_deterministic(text in arb_source(), offset in 0usize..600, model in arb_data_model()) {
        let query = CompletionQuery::new(text, offset);
        let first = complete(&query, &options(model));
        let second = complete(&query, &options(model));
        prop_assert_eq!(first, second);
    }

    /// Qualified results never contain duplicates and unqualified results
    /// never name the global scope.
    #[test]
    fn visited_names_are_distinct_and_non_empty(text in arb_source(), offset in 0usize..600) {
        if let Ok(result) = complete(&CompletionQuery::new(text, offset), &CompletionOptions::default()) {
            let mut names = result.sorted_namespaces();
            let total = names.len();
            names.dedup();
            prop_assert_eq!(names.len(), total);
            prop_assert!(names.iter().all(|name| !name.is_empty()));
        }
    }

    /// Text past the cursor does not change what a cursor inside a comment
    /// reports.
    #[test]
    fn comment_cursor_ignores_trailing_text(prefix in arb_source(), suffix in arb_source()) {
        let text = format!("{prefix}\n// note {suffix}");
        let offset = prefix.len() + "\n// no".len();
        let error = complete(&CompletionQuery::new(text, offset), &CompletionOptions::default());
        prop_assert!(
            matches!(error, Err(CompletionError::NoContext { .. })),
            "expected no context, got {:?}",
            error
        );
    }
}
