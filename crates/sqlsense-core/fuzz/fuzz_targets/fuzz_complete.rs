//! Fuzz target for completion.
//!
//! `complete()` must not panic for any query, cursor or catalog and must
//! respect the result limit.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sqlsense_core::{complete, ColumnInfo, CompletionRequest, TableCatalogEntry};

#[derive(Debug, Arbitrary)]
struct FuzzTable {
    schema: String,
    name: String,
    columns: Vec<(String, String, Vec<String>)>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    query: String,
    cursor: usize,
    tables: Vec<FuzzTable>,
    max_results: u8,
    structured: bool,
}

fuzz_target!(|input: FuzzInput| {
    let catalog = input
        .tables
        .into_iter()
        .map(|table| {
            let columns = table
                .columns
                .into_iter()
                .map(|(name, data_type, values)| ColumnInfo::new(name, data_type).with_values(values))
                .collect();
            TableCatalogEntry::new(table.schema, table.name, columns)
        })
        .collect();

    let cursor = if input.query.is_empty() {
        0
    } else {
        input.cursor % (input.query.len() + 8)
    };
    let mut request = CompletionRequest::new(input.query, cursor, catalog);
    request.options.max_results = usize::from(input.max_results);
    request.options.structured_parse = input.structured;
    if input.structured {
        sqlsense_core::init_structured_parser();
    }

    let suggestions = complete(&request);
    assert!(suggestions.len() <= request.options.max_results);
});
