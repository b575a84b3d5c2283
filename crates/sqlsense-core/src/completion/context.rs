//! Cursor context assembly.
//!
//! A [`CursorContext`] is rebuilt from scratch for every request: scan the
//! text around the cursor, resolve table references (structured parse first,
//! patterns otherwise), then look for value and function positions.

#[cfg(feature = "tracing")]
use tracing::debug;

use super::adapter::{structured_context, StructuredContext};
use super::heuristic::{extract_following_refs, extract_table_refs};
use super::positions::{detect_function_position, detect_value_position, ResolvedTables};
use super::scanner::scan;
use crate::types::{CompletionOptions, CursorContext, RefResolution};

/// Builds the cursor context for `query` at `cursor_offset`. Out-of-range
/// offsets are clamped.
pub(crate) fn build_context(
    query: &str,
    cursor_offset: usize,
    options: &CompletionOptions,
) -> CursorContext {
    let scan = scan(query, cursor_offset);

    let mut context = CursorContext {
        text_before: scan.text_before.to_string(),
        text_after: scan.text_after.to_string(),
        current_word: scan.word.current_word,
        context_type: scan.context_type,
        trigger_character: scan.word.trigger_character,
        is_after_trigger: scan.word.is_after_trigger,
        qualifier: scan.word.qualifier,
        ..CursorContext::default()
    };

    match structured_context(scan.text_before, options) {
        Some(structured) if !structured.table_refs.is_empty() => {
            apply_structured(&mut context, structured);
        }
        partial => apply_heuristic(&mut context, scan.text_before, scan.text_after, partial),
    }

    #[cfg(feature = "tracing")]
    debug!(
        context_type = ?context.context_type,
        resolution = ?context.resolution,
        table_refs = context.table_refs.len(),
        "resolved cursor context"
    );

    let tables = ResolvedTables {
        table_refs: &context.table_refs,
        aliases: &context.aliases,
        target_table: context.target_table.as_ref(),
    };
    let value_position = detect_value_position(scan.text_before, context.context_type, tables);
    let function_position = detect_function_position(scan.text_before);
    context.value_position = value_position;
    context.function_position = function_position;

    context
}

fn apply_structured(context: &mut CursorContext, structured: StructuredContext) {
    context.table_refs = structured.table_refs;
    context.aliases = structured.aliases;
    context.cte_names = structured.cte_names;
    context.target_table = structured.target_table;
    context.resolution = RefResolution::Structured;
}

/// Pattern-based references. Whatever a parse without table references still
/// found (CTE names, aliases, the DML target) is kept.
fn apply_heuristic(
    context: &mut CursorContext,
    text_before: &str,
    text_after: &str,
    partial: Option<StructuredContext>,
) {
    let heuristic = extract_table_refs(text_before);
    context.table_refs = heuristic.table_refs;
    if context.table_refs.is_empty() {
        context.table_refs = extract_following_refs(text_after);
    }
    context.target_table = heuristic.target_table;
    context.resolution = RefResolution::Heuristic;

    if let Some(structured) = partial {
        context.aliases = structured.aliases;
        context.cte_names = structured.cte_names;
        if structured.target_table.is_some() {
            context.target_table = structured.target_table;
        }
    }
}
