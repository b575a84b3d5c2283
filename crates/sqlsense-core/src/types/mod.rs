//! Types for the SQL completion API.
//!
//! This module defines the request, context and response types exchanged with
//! the editor surface. Every value here is created fresh per request; the
//! catalog inside a request is read-only input supplied by the caller.

mod completion;
mod request;
mod response;

// Re-export all public types
pub use completion::{
    ContextType, CursorContext, FunctionPosition, NormalizedTableRef, RefResolution, TableBinding,
    ValuePosition,
};
pub use request::{
    ColumnInfo, CompletionOptions, CompletionRequest, Dialect, TableCatalogEntry,
    DEFAULT_MAX_RESULTS, DEFAULT_MIN_PARSE_LENGTH, MAX_QUERY_LENGTH,
};
pub use response::{Suggestion, SuggestionKind};
