//! Cursor-aware SQL completion over a caller-supplied catalog.
//!
//! Given an incomplete query and a cursor offset, the engine works out what
//! is being typed (a table, a column, a keyword, a literal value or a
//! function argument) and returns ranked suggestions drawn from the catalog
//! in the request.
//!
//! ```
//! use sqlsense_core::{complete, ColumnInfo, CompletionRequest, TableCatalogEntry};
//!
//! let catalog = vec![TableCatalogEntry::new(
//!     "public",
//!     "users",
//!     vec![ColumnInfo::new("id", "integer"), ColumnInfo::new("email", "varchar")],
//! )];
//! let query = "SELECT * FROM users WHERE em";
//! let suggestions = complete(&CompletionRequest::new(query, query.len(), catalog));
//! assert_eq!(suggestions[0].label, "email");
//! ```
//!
//! A structured SQL parser is used when it has been initialized (see
//! [`start_structured_parser`]); until then, and whenever it cannot make sense
//! of the text, table references are extracted with patterns.

pub mod completion;
pub mod error;
pub mod types;

#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

// Re-export main types and functions
pub use completion::{
    init_structured_parser, start_structured_parser, structured_parser_status,
    StructuredParserStatus,
};
pub use error::CompletionError;

// Re-export types explicitly
pub use types::{
    ColumnInfo, CompletionOptions, CompletionRequest, ContextType, CursorContext, Dialect,
    FunctionPosition, NormalizedTableRef, RefResolution, Suggestion, SuggestionKind,
    TableBinding, TableCatalogEntry, ValuePosition, DEFAULT_MAX_RESULTS, MAX_QUERY_LENGTH,
};

/// Returns ranked suggestions for the cursor position in `request`.
///
/// Never fails: an out-of-range cursor is clamped, and a query larger than
/// [`MAX_QUERY_LENGTH`] yields no suggestions.
#[must_use]
pub fn complete(request: &CompletionRequest) -> Vec<Suggestion> {
    #[cfg(feature = "tracing")]
    let _span = info_span!(
        "complete",
        query_len = request.query.len(),
        cursor = request.cursor_offset
    )
    .entered();

    if request.query.len() > MAX_QUERY_LENGTH {
        #[cfg(feature = "tracing")]
        debug!(len = request.query.len(), "query too large, returning no suggestions");
        return Vec::new();
    }

    let ctx = completion::cursor_context(request);
    completion::suggestions_for(&ctx, request)
}

/// Like [`complete`], but rejects malformed requests instead of clamping.
pub fn try_complete(request: &CompletionRequest) -> Result<Vec<Suggestion>, CompletionError> {
    request.validate()?;
    Ok(complete(request))
}

/// Returns the cursor context the engine derives for `request`.
///
/// Useful for editor integrations that render their own candidates and for
/// debugging. Queries larger than [`MAX_QUERY_LENGTH`] produce an empty
/// context.
#[must_use]
pub fn completion_context(request: &CompletionRequest) -> CursorContext {
    if request.query.len() > MAX_QUERY_LENGTH {
        return CursorContext::default();
    }
    completion::cursor_context(request)
}
