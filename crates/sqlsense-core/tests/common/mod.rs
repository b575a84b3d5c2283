#![allow(dead_code)]

use sqlsense_core::{
    ColumnInfo, CompletionOptions, CompletionRequest, Suggestion, SuggestionKind,
    TableCatalogEntry,
};

/// Catalog used across integration tests:
/// `public.users`, `public.orders` and `sales."Order Items"`.
pub fn sample_catalog() -> Vec<TableCatalogEntry> {
    vec![
        TableCatalogEntry::new(
            "public",
            "users",
            vec![
                ColumnInfo::new("id", "integer"),
                ColumnInfo::new("email", "varchar"),
                ColumnInfo::new("name", "varchar"),
                ColumnInfo::new("status", "varchar").with_values(["active", "inactive"]),
                ColumnInfo::new("is_admin", "boolean"),
            ],
        ),
        TableCatalogEntry::new(
            "public",
            "orders",
            vec![
                ColumnInfo::new("id", "integer"),
                ColumnInfo::new("user_id", "integer"),
                ColumnInfo::new("total", "numeric"),
                ColumnInfo::new("created_at", "timestamp"),
            ],
        ),
        TableCatalogEntry::new(
            "sales",
            "Order Items",
            vec![
                ColumnInfo::new("sku", "text"),
                ColumnInfo::new("qty", "integer"),
            ],
        ),
    ]
}

/// Creates a request with the cursor at the `|` marker.
/// Example: `"SELECT | FROM users"` places the cursor after SELECT.
pub fn request_at_cursor(sql: &str) -> CompletionRequest {
    let cursor_offset = sql.find('|').expect("sql must contain cursor marker '|'");
    let clean_sql = sql.replacen('|', "", 1);
    CompletionRequest::new(clean_sql, cursor_offset, sample_catalog())
}

/// Same as [`request_at_cursor`] with the structured parser switched off.
pub fn heuristic_request_at_cursor(sql: &str) -> CompletionRequest {
    let mut request = request_at_cursor(sql);
    request.options = CompletionOptions {
        structured_parse: false,
        ..CompletionOptions::default()
    };
    request
}

pub fn labels(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.label.as_str()).collect()
}

pub fn labels_of_kind(suggestions: &[Suggestion], kind: SuggestionKind) -> Vec<&str> {
    suggestions
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.label.as_str())
        .collect()
}

pub fn find<'a>(suggestions: &'a [Suggestion], label: &str, kind: SuggestionKind) -> &'a Suggestion {
    suggestions
        .iter()
        .find(|s| s.label == label && s.kind == kind)
        .unwrap_or_else(|| panic!("expected {label} ({kind:?}) in {:?}", labels(suggestions)))
}
