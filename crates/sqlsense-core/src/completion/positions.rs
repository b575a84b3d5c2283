//! Value and function-argument position detection.
//!
//! A value position is an open single-quoted literal whose column can be
//! named: `col = '`, `t.col = '`, `s.t.col = '`, a tuple inside
//! `INSERT ... VALUES (` or an assignment inside `UPDATE ... SET`. Only a
//! single `=` directly before the quote is recognized.
//!
//! A function position is the innermost unclosed `(` that follows a known
//! function name.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::functions::is_known_function;
use super::patterns::{
    inside_open_literal, last_statement, mask_closed_groups, mask_string_literals,
    qualified_ident_pattern, split_identifier_parts, unquote, IDENT_PART, LITERAL_QUOTE,
};
use crate::types::{ContextType, FunctionPosition, NormalizedTableRef, TableBinding, ValuePosition};

static SCHEMA_TABLE_COLUMN_EQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({part})\.({part})\.({part})\s*=\s*$",
        part = IDENT_PART
    ))
    .expect("Invalid regex pattern")
});

static TABLE_COLUMN_EQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({part})\.({part})\s*=\s*$", part = IDENT_PART))
        .expect("Invalid regex pattern")
});

static COLUMN_EQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:^|[^\w$.])({part})\s*=\s*$", part = IDENT_PART))
        .expect("Invalid regex pattern")
});

static VALUES_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bVALUES\b").expect("Invalid regex pattern"));

static SET_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSET\b").expect("Invalid regex pattern"));

/// `INSERT INTO t (a, b) VALUES`
static INSERT_COLUMN_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bINTO\s+{ident}\s*\(([^()]*)\)\s*VALUES\b",
        ident = qualified_ident_pattern()
    ))
    .expect("Invalid regex pattern")
});

static FUNCTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][\w$]*)\s*$").expect("Invalid regex pattern"));

/// Table references resolved for the current statement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedTables<'a> {
    pub table_refs: &'a [NormalizedTableRef],
    pub aliases: &'a BTreeMap<String, TableBinding>,
    pub target_table: Option<&'a NormalizedTableRef>,
}

/// Detects an open literal tied to a column. Runs only in where, insert and
/// update contexts.
pub(crate) fn detect_value_position(
    text_before: &str,
    context_type: ContextType,
    tables: ResolvedTables<'_>,
) -> Option<ValuePosition> {
    if !context_type.accepts_values() || !inside_open_literal(text_before) {
        return None;
    }

    let quote = text_before.rfind(LITERAL_QUOTE)?;
    let partial = text_before[quote + 1..].to_string();
    let head = last_statement(&text_before[..quote]);

    match context_type {
        ContextType::Where => column_value_position(head, partial, tables, None),
        ContextType::Update => {
            let masked = mask_string_literals(head);
            if !SET_KEYWORD.is_match(&masked) {
                return None;
            }
            column_value_position(head, partial, tables, tables.target_table)
        }
        ContextType::Insert => insert_value_position(head, partial, tables.target_table?),
        _ => None,
    }
}

/// Backward scan for `schema.table.column =`, `table.column =` and
/// `column =`, first match wins. A bare column needs `default_table` or a
/// single referenced table.
fn column_value_position(
    head: &str,
    partial: String,
    tables: ResolvedTables<'_>,
    default_table: Option<&NormalizedTableRef>,
) -> Option<ValuePosition> {
    if let Some(caps) = SCHEMA_TABLE_COLUMN_EQ.captures(head) {
        return Some(ValuePosition {
            schema: Some(unquote(caps.get(1)?.as_str())),
            table: unquote(caps.get(2)?.as_str()),
            column: Some(unquote(caps.get(3)?.as_str())),
            partial,
        });
    }

    if let Some(caps) = TABLE_COLUMN_EQ.captures(head) {
        let qualifier = unquote(caps.get(1)?.as_str());
        let (schema, table) = resolve_qualifier(&qualifier, tables);
        return Some(ValuePosition {
            schema,
            table,
            column: Some(unquote(caps.get(2)?.as_str())),
            partial,
        });
    }

    if let Some(caps) = COLUMN_EQ.captures(head) {
        let table_ref = default_table.or_else(|| sole_table(tables.table_refs))?;
        return Some(ValuePosition {
            schema: table_ref.schema.clone(),
            table: table_ref.table.clone(),
            column: Some(unquote(caps.get(1)?.as_str())),
            partial,
        });
    }

    None
}

/// The table a bare column belongs to, when exactly one distinct table is
/// referenced.
fn sole_table(table_refs: &[NormalizedTableRef]) -> Option<&NormalizedTableRef> {
    let (first, rest) = table_refs.split_first()?;
    rest.iter()
        .all(|other| {
            other.table.eq_ignore_ascii_case(&first.table)
                && match (&other.schema, &first.schema) {
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    _ => true,
                }
        })
        .then_some(first)
}

/// Resolves a column qualifier through aliases, then table references.
/// Unknown qualifiers are taken as a bare table name.
fn resolve_qualifier(qualifier: &str, tables: ResolvedTables<'_>) -> (Option<String>, String) {
    if let Some(binding) = tables
        .aliases
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(qualifier))
        .map(|(_, binding)| binding)
    {
        return (binding.schema.clone(), binding.table.clone());
    }
    if let Some(table_ref) = tables
        .table_refs
        .iter()
        .chain(tables.target_table)
        .find(|table_ref| table_ref.table.eq_ignore_ascii_case(qualifier))
    {
        return (table_ref.schema.clone(), table_ref.table.clone());
    }
    (None, qualifier.to_string())
}

/// Open literal inside a `VALUES (` tuple. The column is taken from an
/// explicit column list when one is present.
fn insert_value_position(
    head: &str,
    partial: String,
    target: &NormalizedTableRef,
) -> Option<ValuePosition> {
    let masked = mask_string_literals(head);
    let values = VALUES_KEYWORD.find_iter(&masked).last()?;
    let tuple_start = unclosed_paren(&masked[values.end()..])? + values.end();
    let index = top_level_commas(&masked[tuple_start + 1..]);

    let column = INSERT_COLUMN_LIST
        .captures_iter(&masked)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|list| {
            split_top_level_list(&head[list.start()..list.end()])
                .into_iter()
                .nth(index)
        })
        .and_then(|name| split_identifier_parts(&name).pop())
        .filter(|name| !name.is_empty());

    Some(ValuePosition {
        schema: target.schema.clone(),
        table: target.table.clone(),
        column,
        partial,
    })
}

/// Detects the innermost unclosed argument list of a known function.
pub(crate) fn detect_function_position(text_before: &str) -> Option<FunctionPosition> {
    let masked = mask_string_literals(last_statement(text_before));
    let open = unclosed_paren(&masked)?;
    let name = FUNCTION_NAME
        .captures(&masked[..open])
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| is_known_function(name))?;

    Some(FunctionPosition {
        name: name.to_ascii_uppercase(),
        param_index: top_level_commas(&masked[open + 1..]),
    })
}

/// Byte offset of the innermost `(` that is still open at the end of `text`.
fn unclosed_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, byte) in text.bytes().enumerate().rev() {
        match byte {
            b')' => depth += 1,
            b'(' if depth == 0 => return Some(pos),
            b'(' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Commas outside nested parentheses.
fn top_level_commas(text: &str) -> usize {
    mask_closed_groups(text).matches(',').count()
}

fn split_top_level_list(text: &str) -> Vec<String> {
    let masked = mask_closed_groups(text);
    let mut items = Vec::new();
    let mut start = 0;
    for (pos, _) in masked.match_indices(',') {
        items.push(text[start..pos].trim().to_string());
        start = pos + 1;
    }
    items.push(text[start..].trim().to_string());
    items
}
