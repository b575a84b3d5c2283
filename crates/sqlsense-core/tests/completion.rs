mod common;

use common::{
    find, heuristic_request_at_cursor, labels, labels_of_kind, request_at_cursor, sample_catalog,
};
use rstest::rstest;
use sqlsense_core::{
    complete, completion_context, try_complete, ColumnInfo, CompletionError, CompletionRequest,
    ContextType, SuggestionKind, TableCatalogEntry,
};

const USERS_COLUMNS_SORTED: [&str; 5] = ["email", "id", "is_admin", "name", "status"];

#[rstest]
#[case("SELECT |", ContextType::Select)]
#[case("SELECT * FROM t |", ContextType::From)]
#[case("SELECT * FROM t WHERE |", ContextType::Where)]
#[case("SELECT * FROM t JOIN |", ContextType::Join)]
#[case("SELECT * FROM t ORDER BY |", ContextType::Order)]
#[case("SELECT a, COUNT(*) FROM t GROUP BY |", ContextType::Group)]
#[case("INSERT INTO t |", ContextType::Insert)]
#[case("UPDATE t SET |", ContextType::Update)]
#[case("DELETE |", ContextType::Delete)]
#[case("DELETE FROM |", ContextType::Delete)]
#[case("DELETE FROM users |", ContextType::Delete)]
#[case("SELECT * FROM users u JOIN orders o ON |", ContextType::Join)]
#[case("|", ContextType::General)]
#[case("SELECT * FROM t whe|", ContextType::From)]
fn test_context_classification(#[case] sql: &str, #[case] expected: ContextType) {
    let ctx = completion_context(&heuristic_request_at_cursor(sql));
    assert_eq!(ctx.context_type, expected, "for {sql:?}");
}

#[test]
fn test_completion_is_deterministic() {
    for sql in [
        "SELECT |",
        "SELECT * FROM |",
        "SELECT * FROM users JOIN orders ON |",
        "SELECT * FROM users WHERE status = '|",
    ] {
        let request = request_at_cursor(sql);
        assert_eq!(complete(&request), complete(&request), "for {sql:?}");
    }
}

#[test]
fn test_trigger_dot_shows_every_column_of_the_table() {
    let suggestions = complete(&heuristic_request_at_cursor(
        "SELECT * FROM users WHERE users.|",
    ));
    assert_eq!(labels(&suggestions), USERS_COLUMNS_SORTED);
    assert!(suggestions.iter().all(|s| s.insert_text == s.label));
}

#[cfg(feature = "structured-parse")]
#[test]
fn test_trigger_dot_after_alias() {
    sqlsense_core::init_structured_parser();
    let suggestions = complete(&request_at_cursor("SELECT * FROM users u WHERE u.|"));
    assert_eq!(labels(&suggestions), USERS_COLUMNS_SORTED);
}

#[test]
fn test_columns_are_qualified_with_multiple_tables() {
    let suggestions = complete(&heuristic_request_at_cursor(
        "SELECT * FROM users JOIN orders ON users.id = orders.user_id WHERE |",
    ));
    assert_eq!(
        find(&suggestions, "user_id", SuggestionKind::Column).insert_text,
        r#""public"."orders".user_id"#
    );
    assert_eq!(
        find(&suggestions, "email", SuggestionKind::Column).insert_text,
        r#""public"."users".email"#
    );
    let ids: Vec<&str> = suggestions
        .iter()
        .filter(|s| s.label == "id")
        .map(|s| s.insert_text.as_str())
        .collect();
    assert_eq!(ids, vec![r#""public"."orders".id"#, r#""public"."users".id"#]);
}

#[cfg(feature = "structured-parse")]
#[test]
fn test_columns_are_qualified_with_aliases() {
    sqlsense_core::init_structured_parser();
    let suggestions = complete(&request_at_cursor(
        "SELECT * FROM users u JOIN orders o ON u.id = o.user_id WHERE |",
    ));
    assert_eq!(find(&suggestions, "user_id", SuggestionKind::Column).insert_text, "o.user_id");
    assert_eq!(find(&suggestions, "email", SuggestionKind::Column).insert_text, "u.email");
    assert_eq!(find(&suggestions, "u", SuggestionKind::Table).insert_text, "u.");
}

#[test]
fn test_single_table_columns_are_bare() {
    let suggestions = complete(&heuristic_request_at_cursor("SELECT * FROM users WHERE |"));
    assert_eq!(find(&suggestions, "email", SuggestionKind::Column).insert_text, "email");
    assert_eq!(
        find(&suggestions, "email", SuggestionKind::Column).detail.as_deref(),
        Some("varchar (users)")
    );
    assert_eq!(
        &labels(&suggestions)[..5],
        USERS_COLUMNS_SORTED,
        "columns rank first in WHERE"
    );
}

#[rstest]
#[case("SELECT * FROM users WHERE status = 'a|", &["active"], &["active'"])]
#[case("SELECT * FROM users WHERE status = '|'", &["active", "inactive"], &["active", "inactive"])]
#[case("SELECT * FROM users WHERE users.is_admin = '|", &["false", "true"], &["false'", "true'"])]
#[case("INSERT INTO users (id, status) VALUES (1, '|", &["active", "inactive"], &["active'", "inactive'"])]
#[case("UPDATE users SET status = 'in|", &["inactive"], &["inactive'"])]
fn test_value_positions(
    #[case] sql: &str,
    #[case] expected_labels: &[&str],
    #[case] expected_inserts: &[&str],
) {
    let suggestions = complete(&request_at_cursor(sql));
    assert_eq!(labels(&suggestions), expected_labels, "for {sql:?}");
    let inserts: Vec<&str> = suggestions.iter().map(|s| s.insert_text.as_str()).collect();
    assert_eq!(inserts, expected_inserts, "for {sql:?}");
    assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Value));
}

#[test]
fn test_value_position_resolves_column() {
    let ctx = completion_context(&heuristic_request_at_cursor(
        "SELECT * FROM public.users WHERE public.users.status = 'ac|",
    ));
    let value = ctx.value_position.unwrap();
    assert_eq!(value.schema.as_deref(), Some("public"));
    assert_eq!(value.table, "users");
    assert_eq!(value.column.as_deref(), Some("status"));
    assert_eq!(value.partial, "ac");
}

#[test]
fn test_value_position_without_known_values_is_empty() {
    let request = request_at_cursor("SELECT * FROM users WHERE email = '|");
    assert_eq!(
        completion_context(&request).value_position.unwrap().column.as_deref(),
        Some("email")
    );
    assert!(complete(&request).is_empty());
}

#[rstest]
#[case(request_at_cursor("SELECT * FROM missing WHERE |"))]
#[case(heuristic_request_at_cursor("SELECT * FROM missing WHERE |"))]
fn test_unknown_table_offers_no_columns(#[case] request: CompletionRequest) {
    let suggestions = complete(&request);
    assert!(labels_of_kind(&suggestions, SuggestionKind::Column).is_empty());
    assert!(!suggestions.is_empty(), "keywords are still offered");
}

#[test]
fn test_function_position_overrides_context() {
    let suggestions = complete(&request_at_cursor("SELECT COUNT(| FROM users"));
    assert_eq!(labels(&suggestions), USERS_COLUMNS_SORTED);
    assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Column));

    let ctx = completion_context(&request_at_cursor("SELECT ROUND(total, | FROM orders"));
    let function = ctx.function_position.unwrap();
    assert_eq!(function.name, "ROUND");
    assert_eq!(function.param_index, 1);
}

#[test]
fn test_output_is_bounded() {
    let columns = (0..200)
        .map(|i| ColumnInfo::new(format!("c{i:03}"), "integer"))
        .collect();
    let catalog = vec![TableCatalogEntry::new("public", "wide", columns)];
    let sql = "SELECT * FROM wide WHERE ";

    let request = CompletionRequest::new(sql, sql.len(), catalog);
    assert_eq!(complete(&request).len(), 50);

    let mut limited = request.clone();
    limited.options.max_results = 10;
    assert_eq!(complete(&limited).len(), 10);
}

#[cfg(feature = "structured-parse")]
#[rstest]
#[case("SELECT * FROM users WHERE |")]
#[case("SELECT * FROM users JOIN orders ON users.id = orders.user_id WHERE |")]
#[case("SELECT id, | FROM users")]
#[case("SELECT * FROM |")]
#[case("SELECT * FROM users WHERE id = 1 AND |")]
fn test_fallback_parity(#[case] sql: &str) {
    sqlsense_core::init_structured_parser();
    let structured = complete(&request_at_cursor(sql));
    let heuristic = complete(&heuristic_request_at_cursor(sql));
    assert_eq!(structured, heuristic, "for {sql:?}");
}

#[test]
fn test_from_ranks_tables_first() {
    let suggestions = complete(&heuristic_request_at_cursor("SELECT * FROM |"));
    assert_eq!(&labels(&suggestions)[..3], ["Order Items", "orders", "users"]);
    assert_eq!(
        find(&suggestions, "users", SuggestionKind::Table).insert_text,
        "public.users "
    );
    assert_eq!(
        find(&suggestions, "Order Items", SuggestionKind::Table).insert_text,
        r#"sales."Order Items" "#
    );
    assert_eq!(
        labels_of_kind(&suggestions, SuggestionKind::Schema),
        vec!["public", "sales"]
    );
}

#[test]
fn test_from_after_table_offers_next_clauses() {
    let suggestions = complete(&heuristic_request_at_cursor("SELECT * FROM users |"));
    let keywords = labels_of_kind(&suggestions, SuggestionKind::Keyword);
    assert!(keywords.contains(&"WHERE"));
    assert!(keywords.contains(&"LEFT JOIN"));
}

#[test]
fn test_schema_qualifier_lists_its_tables() {
    let suggestions = complete(&heuristic_request_at_cursor("SELECT * FROM sales.|"));
    assert_eq!(labels(&suggestions), ["Order Items"]);
    assert_eq!(suggestions[0].insert_text, "\"Order Items\" ");
}

#[test]
fn test_only_the_current_statement_counts() {
    let suggestions = complete(&heuristic_request_at_cursor(
        "SELECT * FROM orders; SELECT * FROM users WHERE |",
    ));
    let mut columns = labels_of_kind(&suggestions, SuggestionKind::Column);
    columns.sort_unstable();
    assert_eq!(columns, USERS_COLUMNS_SORTED);
}

#[test]
fn test_prefix_match_ranks_first() {
    let suggestions = complete(&request_at_cursor("SELECT * FROM users WHERE em|"));
    assert_eq!(suggestions[0].label, "email");

    let functions = complete(&request_at_cursor("SELECT co| FROM users"));
    assert_eq!(labels(&functions), ["COALESCE", "CONCAT", "COUNT"]);
    assert_eq!(functions[2].insert_text, "COUNT(");
}

#[cfg(feature = "structured-parse")]
#[test]
fn test_cte_names_are_offered_first_in_from() {
    sqlsense_core::init_structured_parser();
    let suggestions = complete(&request_at_cursor(
        "WITH recent AS (SELECT * FROM orders) SELECT * FROM |",
    ));
    assert_eq!(suggestions[0].label, "recent");
    assert_eq!(suggestions[0].detail.as_deref(), Some("CTE"));
}

#[test]
fn test_empty_catalog_still_offers_keywords() {
    let request = CompletionRequest::new("SEL", 3, vec![]);
    let suggestions = complete(&request);
    assert_eq!(labels(&suggestions), ["SELECT"]);
}

#[test]
fn test_try_complete_validates() {
    let request = CompletionRequest::new("SELECT é", 8, sample_catalog());
    assert!(matches!(
        try_complete(&request),
        Err(CompletionError::CursorNotCharBoundary { offset: 8 })
    ));

    let valid = request_at_cursor("SELECT * FROM users WHERE |");
    assert_eq!(try_complete(&valid).unwrap(), complete(&valid));
}
