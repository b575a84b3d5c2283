//! SQL completion module.
//!
//! This module provides cursor-aware completion with a hybrid strategy:
//! a best-effort structured parse of the text before the cursor when the
//! parser is ready, and pattern-based extraction otherwise.

mod adapter;
#[cfg(feature = "structured-parse")]
mod ast_extractor;
mod context;
pub mod functions;
mod generator;
mod heuristic;
#[cfg(feature = "structured-parse")]
mod parse_strategies;
mod patterns;
mod positions;
mod ranking;
mod scanner;

pub use adapter::{
    init_structured_parser, start_structured_parser, structured_parser_status,
    StructuredParserStatus,
};
pub use functions::{all_functions, lookup_function, FunctionCategory, FunctionSpec};

use crate::types::{CompletionRequest, CursorContext, Suggestion};
use generator::Catalog;

/// Builds the cursor context for a request. The cursor is clamped into the
/// query.
pub(crate) fn cursor_context(request: &CompletionRequest) -> CursorContext {
    context::build_context(&request.query, request.cursor_offset, &request.options)
}

/// Generates and ranks suggestions for a prepared context.
pub(crate) fn suggestions_for(ctx: &CursorContext, request: &CompletionRequest) -> Vec<Suggestion> {
    let schema_names = request.effective_schema_names();
    let candidates = generator::generate(
        ctx,
        Catalog {
            tables: &request.catalog_tables,
            schema_names: &schema_names,
        },
    );
    ranking::rank(ctx, candidates, request.options.max_results)
}
