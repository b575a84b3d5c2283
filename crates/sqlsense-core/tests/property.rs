mod common;

use common::sample_catalog;
use proptest::prelude::*;
use sqlsense_core::{complete, completion_context, CompletionOptions, CompletionRequest};

fn sql_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("SELECT ".to_string()),
        Just("FROM ".to_string()),
        Just("WHERE ".to_string()),
        Just("JOIN ".to_string()),
        Just("ON ".to_string()),
        Just("INSERT INTO ".to_string()),
        Just("VALUES (".to_string()),
        Just("UPDATE ".to_string()),
        Just("SET ".to_string()),
        Just("users ".to_string()),
        Just("orders o ".to_string()),
        Just("\"Order Items\" ".to_string()),
        Just("u.".to_string()),
        Just("sales.".to_string()),
        Just("COUNT(".to_string()),
        Just(") ".to_string()),
        Just(", ".to_string()),
        Just("= '".to_string()),
        Just("; ".to_string()),
        "[a-z_]{1,6} ",
    ]
}

fn sql_like() -> impl Strategy<Value = String> {
    prop::collection::vec(sql_fragment(), 0..12).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn complete_never_panics_on_arbitrary_text(query in "\\PC{0,120}", cursor in 0usize..200) {
        let request = CompletionRequest::new(query, cursor, sample_catalog());
        let suggestions = complete(&request);
        prop_assert!(suggestions.len() <= request.options.max_results);
    }

    #[test]
    fn completion_is_deterministic(query in sql_like(), cursor in 0usize..160) {
        let request = CompletionRequest::new(query, cursor, sample_catalog());
        prop_assert_eq!(complete(&request), complete(&request));
        prop_assert_eq!(completion_context(&request), completion_context(&request));
    }

    #[test]
    fn output_respects_max_results(query in sql_like(), max_results in 0usize..20) {
        let cursor = query.len();
        let mut request = CompletionRequest::new(query, cursor, sample_catalog());
        request.options = CompletionOptions {
            max_results,
            ..CompletionOptions::default()
        };
        prop_assert!(complete(&request).len() <= max_results);
    }

    #[test]
    fn typed_word_filters_every_suggestion(query in sql_like(), word in "[a-z]{1,3}") {
        let sql = format!("{query}{word}");
        let request = CompletionRequest::new(sql.clone(), sql.len(), sample_catalog());
        let ctx = completion_context(&request);
        prop_assume!(ctx.value_position.is_none() && ctx.qualifier.is_none());
        prop_assume!(ctx.current_word == word);
        for suggestion in complete(&request) {
            prop_assert!(
                suggestion.label.to_lowercase().starts_with(&word),
                "{} does not start with {}",
                suggestion.label,
                word
            );
        }
    }
}
