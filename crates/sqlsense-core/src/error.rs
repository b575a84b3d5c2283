//! Error types for completion requests.
//!
//! # Error Handling Strategy
//!
//! Completion never fails in the steady state: an incomplete query, a parser
//! that is not ready, or a reference the catalog cannot resolve all degrade to
//! fewer suggestions. The only errors are malformed requests, which
//! [`crate::complete`] absorbs (clamping or returning nothing) and
//! [`crate::try_complete`] reports as [`CompletionError`].

use thiserror::Error;

/// A request the engine cannot serve as given.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("query exceeds maximum length of {max} bytes ({len} bytes provided)")]
    QueryTooLarge { len: usize, max: usize },

    #[error("cursor offset ({offset}) exceeds query length ({len})")]
    CursorOutOfBounds { offset: usize, len: usize },

    #[error("cursor offset ({offset}) does not land on a UTF-8 character boundary")]
    CursorNotCharBoundary { offset: usize },

    #[error("invalid completion request: {0}")]
    InvalidRequest(#[source] serde_json::Error),
}
