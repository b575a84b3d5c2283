//! Best-effort structured parsing of the text before the cursor.
//!
//! The structured parser is a process-wide capability that is initialized at
//! most once. Until initialization finishes, or when it fails, every request
//! sees the adapter as unavailable and falls back to the heuristic extractor.
//! A request never blocks on initialization and never retries it.

use std::collections::BTreeMap;
use std::sync::{Once, OnceLock};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use super::patterns::{inside_open_literal, last_statement};
use crate::types::{CompletionOptions, NormalizedTableRef, TableBinding};

/// Initialization state of the structured parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredParserStatus {
    /// Initialization has not finished yet
    Pending,
    /// The parser is usable
    Ready,
    /// Initialization failed or the parser was compiled out
    Unavailable,
}

/// Terminal capability state. Unset means initialization is still running.
#[derive(Debug)]
enum Capability {
    Unavailable,
    Ready(Adapter),
}

/// Handle to a working structured parser.
#[derive(Debug)]
struct Adapter;

static CAPABILITY: OnceLock<Capability> = OnceLock::new();
static START: Once = Once::new();

/// What the structured parse found in the current statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StructuredContext {
    pub table_refs: Vec<NormalizedTableRef>,
    pub aliases: BTreeMap<String, TableBinding>,
    pub cte_names: Vec<String>,
    pub target_table: Option<NormalizedTableRef>,
}

/// Starts initializing the structured parser on a background thread.
///
/// Returns immediately. Calling this more than once has no further effect.
/// Hosts without threads should call [`init_structured_parser`] instead.
pub fn start_structured_parser() {
    START.call_once(|| {
        let spawned = std::thread::Builder::new()
            .name("sqlsense-parser-init".to_string())
            .spawn(|| {
                init_structured_parser();
            });
        if spawned.is_err() {
            // Without a thread the capability can never become ready.
            let _ = CAPABILITY.set(Capability::Unavailable);
            #[cfg(feature = "tracing")]
            warn!("could not spawn structured parser initialization thread");
        }
    });
}

/// Initializes the structured parser on the calling thread and returns the
/// resulting status. Idempotent.
pub fn init_structured_parser() -> StructuredParserStatus {
    let capability = CAPABILITY.get_or_init(|| {
        let capability = probe();
        #[cfg(feature = "tracing")]
        log_capability(&capability);
        capability
    });
    status_of(Some(capability))
}

#[cfg(feature = "tracing")]
fn log_capability(capability: &Capability) {
    match capability {
        Capability::Ready(_) => debug!("structured parser ready"),
        Capability::Unavailable => warn!("structured parser unavailable"),
    }
}

/// Current initialization state of the structured parser.
pub fn structured_parser_status() -> StructuredParserStatus {
    status_of(CAPABILITY.get())
}

fn status_of(capability: Option<&Capability>) -> StructuredParserStatus {
    match capability {
        None => StructuredParserStatus::Pending,
        Some(Capability::Ready(_)) => StructuredParserStatus::Ready,
        Some(Capability::Unavailable) => StructuredParserStatus::Unavailable,
    }
}

#[cfg(feature = "structured-parse")]
fn probe() -> Capability {
    let parsed = std::panic::catch_unwind(|| {
        let dialect = sqlparser::dialect::GenericDialect {};
        sqlparser::parser::Parser::parse_sql(&dialect, "SELECT 1").is_ok()
    });
    match parsed {
        Ok(true) => Capability::Ready(Adapter),
        _ => Capability::Unavailable,
    }
}

#[cfg(not(feature = "structured-parse"))]
fn probe() -> Capability {
    Capability::Unavailable
}

/// Structured context for the statement before the cursor, or `None` when the
/// adapter is unavailable, the request opts out, or nothing parses.
pub(crate) fn structured_context(
    text_before: &str,
    options: &CompletionOptions,
) -> Option<StructuredContext> {
    if !options.structured_parse {
        return None;
    }
    if text_before.trim().len() < options.min_parse_length {
        return None;
    }
    if inside_open_literal(text_before) {
        return None;
    }

    match CAPABILITY.get() {
        Some(Capability::Ready(adapter)) => adapter.extract(last_statement(text_before), options),
        _ => {
            #[cfg(feature = "tracing")]
            debug!("structured parser not ready, using heuristic extraction");
            None
        }
    }
}

impl Adapter {
    #[cfg(feature = "structured-parse")]
    fn extract(&self, statement: &str, options: &CompletionOptions) -> Option<StructuredContext> {
        use super::ast_extractor::extract_statement_context;
        use super::parse_strategies::try_parse_for_completion;

        let parsed = try_parse_for_completion(statement, options.dialect)?;
        #[cfg(feature = "tracing")]
        debug!(strategy = ?parsed.strategy, "structured parse succeeded");
        parsed.last_statement().map(extract_statement_context)
    }

    #[cfg(not(feature = "structured-parse"))]
    fn extract(&self, _statement: &str, _options: &CompletionOptions) -> Option<StructuredContext> {
        None
    }
}
