//! Pattern-based table reference extraction.
//!
//! Used whenever the structured parser is unavailable or finds no tables.
//! Recognizes `FROM a, b`, `[LEFT|RIGHT|FULL [OUTER]|INNER|CROSS] JOIN t`,
//! `INSERT INTO t` and `UPDATE t`. Aliases and CTE names are never produced
//! here.
//!
//! When nothing is referenced before the cursor, the rest of the statement
//! after the cursor is scanned too, so `SELECT | FROM users` still resolves.

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::{
    last_statement, mask_string_literals, normalize_table_ref, qualified_ident_pattern,
};
use crate::types::NormalizedTableRef;

static FROM_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\s+").expect("Invalid regex pattern"));

/// One item of a FROM list, anchored at the start of the remaining text.
static FROM_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^({ident})(?:\s+(?:AS\s+)?[A-Za-z_][\w$]*)?\s*",
        ident = qualified_ident_pattern()
    ))
    .expect("Invalid regex pattern")
});

static JOIN_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:LEFT|RIGHT|FULL)(?:\s+OUTER)?\s+|INNER\s+|CROSS\s+)?JOIN\s+({ident})",
        ident = qualified_ident_pattern()
    ))
    .expect("Invalid regex pattern")
});

static INSERT_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bINSERT\s+INTO\s+({ident})",
        ident = qualified_ident_pattern()
    ))
    .expect("Invalid regex pattern")
});

static UPDATE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bUPDATE\s+({ident})",
        ident = qualified_ident_pattern()
    ))
    .expect("Invalid regex pattern")
});

/// Table references found by pattern matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HeuristicRefs {
    /// In order of appearance
    pub table_refs: Vec<NormalizedTableRef>,
    /// INSERT/UPDATE target
    pub target_table: Option<NormalizedTableRef>,
}

/// Extracts table references from the last statement of `text_before`.
pub(crate) fn extract_table_refs(text_before: &str) -> HeuristicRefs {
    let statement = last_statement(text_before);
    let masked = mask_string_literals(statement);

    HeuristicRefs {
        table_refs: collect_refs(statement, &masked, Typing::AtEnd),
        target_table: extract_target(statement, &masked),
    }
}

/// FROM and JOIN references in the remainder of the statement after the
/// cursor.
pub(crate) fn extract_following_refs(text_after: &str) -> Vec<NormalizedTableRef> {
    let masked = mask_string_literals(text_after);
    let end = masked.find(';').unwrap_or(masked.len());
    collect_refs(&text_after[..end], &masked[..end], Typing::Nowhere)
}

/// Whether an identifier touching the end of the text is still being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Typing {
    AtEnd,
    Nowhere,
}

fn collect_refs(statement: &str, masked: &str, typing: Typing) -> Vec<NormalizedTableRef> {
    let mut found: Vec<(usize, NormalizedTableRef)> = Vec::new();
    collect_from_lists(statement, masked, typing, &mut found);
    for pattern in [&*JOIN_TARGET, &*UPDATE_TARGET] {
        collect_matches(pattern, statement, masked, typing, &mut found);
    }
    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, table_ref)| table_ref).collect()
}

fn extract_target(statement: &str, masked: &str) -> Option<NormalizedTableRef> {
    let mut targets = Vec::new();
    for pattern in [&*INSERT_TARGET, &*UPDATE_TARGET] {
        collect_matches(pattern, statement, masked, Typing::AtEnd, &mut targets);
    }
    targets
        .into_iter()
        .max_by_key(|(start, _)| *start)
        .map(|(_, table_ref)| table_ref)
}

fn collect_from_lists(
    statement: &str,
    masked: &str,
    typing: Typing,
    found: &mut Vec<(usize, NormalizedTableRef)>,
) {
    for keyword in FROM_KEYWORD.find_iter(masked) {
        let mut pos = keyword.end();
        while let Some(caps) = FROM_ITEM.captures(&masked[pos..]) {
            let Some(ident) = caps.get(1) else {
                break;
            };
            let (start, end) = (pos + ident.start(), pos + ident.end());
            if let Some(table_ref) = completed_ref(statement, start, end, typing) {
                found.push((start, table_ref));
            }
            pos += caps.get(0).map_or(ident.end(), |m| m.end());
            match masked[pos..].strip_prefix(',') {
                Some(rest) => pos = masked.len() - rest.trim_start().len(),
                None => break,
            }
        }
    }
}

fn collect_matches(
    pattern: &Regex,
    statement: &str,
    masked: &str,
    typing: Typing,
    found: &mut Vec<(usize, NormalizedTableRef)>,
) {
    for caps in pattern.captures_iter(masked) {
        if let Some(ident) = caps.get(1) {
            if let Some(table_ref) = completed_ref(statement, ident.start(), ident.end(), typing) {
                found.push((ident.start(), table_ref));
            }
        }
    }
}

/// Normalizes the identifier at `start..end` unless it is still being typed
/// or continues with a `.`.
fn completed_ref(
    statement: &str,
    start: usize,
    end: usize,
    typing: Typing,
) -> Option<NormalizedTableRef> {
    let at_end = end >= statement.len();
    if (at_end && typing == Typing::AtEnd) || statement[end..].starts_with('.') {
        return None;
    }
    normalize_table_ref(&statement[start..end])
}
