//! Fuzz target for cursor context derivation.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sqlsense_core::{completion_context, CompletionRequest, Dialect};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    query: String,
    cursor: u16,
    dialect_idx: u8,
}

impl FuzzInput {
    fn dialect(&self) -> Dialect {
        match self.dialect_idx % 5 {
            0 => Dialect::Generic,
            1 => Dialect::Postgres,
            2 => Dialect::Snowflake,
            3 => Dialect::Bigquery,
            _ => Dialect::Duckdb,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    sqlsense_core::init_structured_parser();

    let dialect = input.dialect();
    let mut request = CompletionRequest::new(input.query, usize::from(input.cursor), Vec::new());
    request.options.dialect = dialect;

    // Out-of-range cursors are clamped, never rejected.
    let ctx = completion_context(&request);
    assert!(ctx.text_before.len() + ctx.text_after.len() <= request.query.len());
});
