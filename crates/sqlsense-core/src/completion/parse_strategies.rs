//! Parse strategies for incomplete SQL.
//!
//! The text before the cursor is rarely a valid statement. These strategies
//! are tried in order of cost until one yields a statement:
//! 1. Full parse
//! 2. Truncation at clause keywords and word boundaries
//! 3. Minimal fixes (trailing comma, unclosed parens, empty SELECT list,
//!    dangling FROM)
//!
//! Note: keyword matching is ASCII-only. String literal contents are masked
//! before searching so keywords inside literals are never matched.

use std::sync::LazyLock;

use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::parser::Parser;

use super::patterns::mask_string_literals;
use crate::types::Dialect;

/// Maximum number of truncation attempts for pathological input.
const MAX_TRUNCATION_ATTEMPTS: usize = 50;

/// Maximum number of parentheses to close in one fix.
const MAX_PAREN_FIXES: usize = 20;

/// Placeholder table used to complete a dangling FROM.
const PLACEHOLDER_TABLE: &str = "_sqlsense_placeholder_";

/// Keywords that usually start a clause where truncation yields valid SQL.
static CLAUSE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s(WHERE|GROUP|HAVING|ORDER|LIMIT|OFFSET|UNION|EXCEPT|INTERSECT|ON|AND|OR|SET|VALUES)\b",
    )
    .expect("Invalid regex pattern")
});

static DANGLING_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(FROM|JOIN|INTO|UPDATE)\s*$").expect("Invalid regex pattern")
});

static TRAILING_COMMA_BEFORE_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),\s*(FROM\b)").expect("Invalid regex pattern"));

static EMPTY_SELECT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSELECT(\s+DISTINCT)?\s*(FROM\b|$)").expect("Invalid regex pattern")
});

/// SQL fix function returning the patched text.
type SqlFixFn = fn(&str) -> Option<String>;

/// Which strategy produced a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseStrategy {
    FullParse,
    Truncated,
    WithFixes,
}

/// Result of a successful parse attempt.
#[derive(Debug, Clone)]
pub(crate) struct ParseResult {
    pub statements: Vec<Statement>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub strategy: ParseStrategy,
}

impl ParseResult {
    /// The statement the cursor is assumed to be in.
    pub fn last_statement(&self) -> Option<&Statement> {
        self.statements.last()
    }
}

/// Try to parse pre-cursor SQL for context extraction.
pub(crate) fn try_parse_for_completion(sql: &str, dialect: Dialect) -> Option<ParseResult> {
    if sql.trim().is_empty() {
        return None;
    }

    if let Some(statements) = try_full_parse(sql, dialect) {
        return Some(ParseResult {
            statements,
            strategy: ParseStrategy::FullParse,
        });
    }

    if let Some(statements) = try_truncated_parse(sql, dialect) {
        return Some(ParseResult {
            statements,
            strategy: ParseStrategy::Truncated,
        });
    }

    if let Some(statements) = try_with_fixes(sql, dialect) {
        return Some(ParseResult {
            statements,
            strategy: ParseStrategy::WithFixes,
        });
    }

    None
}

fn parse(sql: &str, dialect: Dialect) -> Option<Vec<Statement>> {
    let dialect_impl = dialect.to_sqlparser_dialect();
    Parser::parse_sql(&*dialect_impl, sql)
        .ok()
        .filter(|stmts| !stmts.is_empty())
}

/// Strategy 1: parse the text as-is
fn try_full_parse(sql: &str, dialect: Dialect) -> Option<Vec<Statement>> {
    parse(sql, dialect)
}

/// Strategy 2: cut the text at progressively earlier safe points
fn try_truncated_parse(sql: &str, dialect: Dialect) -> Option<Vec<Statement>> {
    find_truncation_candidates(sql)
        .into_iter()
        .map(|pos| &sql[..pos])
        .filter(|truncated| !truncated.trim().is_empty())
        .find_map(|truncated| parse(truncated, dialect))
}

/// Strategy 3: patch the text so the parser accepts it
fn try_with_fixes(sql: &str, dialect: Dialect) -> Option<Vec<Statement>> {
    let fixes: [SqlFixFn; 4] = [
        fix_trailing_comma,
        fix_unclosed_parens,
        fix_incomplete_select,
        fix_incomplete_from,
    ];

    for fix in fixes {
        if let Some(fixed) = fix(sql) {
            if let Some(statements) = parse(&fixed, dialect) {
                return Some(statements);
            }
        }
    }

    // Fixes compose: "SELECT COUNT(a, FROM" needs more than one.
    let combined = fixes
        .iter()
        .fold(sql.to_string(), |acc, fix| fix(&acc).unwrap_or(acc));
    parse(&combined, dialect)
}

/// Candidate truncation points: clause keyword boundaries first, then word
/// boundaries, each longest first. Positions are char boundaries outside
/// string literals, capped at `MAX_TRUNCATION_ATTEMPTS`.
fn find_truncation_candidates(sql: &str) -> Vec<usize> {
    let masked = mask_string_literals(sql);
    let mut keyword_positions: Vec<usize> = CLAUSE_KEYWORD
        .captures_iter(&masked)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.start())
        .collect();
    keyword_positions.sort_unstable_by(|a, b| b.cmp(a));

    let mut word_positions = Vec::new();
    let mut in_literal = false;
    for (pos, ch) in sql.char_indices() {
        if ch == '\'' {
            in_literal = !in_literal;
        }
        if !in_literal && (ch.is_alphanumeric() || matches!(ch, '_' | ')' | '"' | '\'')) {
            word_positions.push(pos + ch.len_utf8());
        }
    }
    word_positions.reverse();

    let mut candidates = Vec::with_capacity(MAX_TRUNCATION_ATTEMPTS);
    for pos in keyword_positions.into_iter().chain(word_positions) {
        if candidates.len() == MAX_TRUNCATION_ATTEMPTS {
            break;
        }
        if pos > 0 && pos < sql.len() && !candidates.contains(&pos) {
            candidates.push(pos);
        }
    }
    candidates
}

/// Fix: drop a comma that directly precedes FROM
fn fix_trailing_comma(sql: &str) -> Option<String> {
    let trimmed = sql.trim_end();
    if let Some(without_comma) = trimmed.strip_suffix(',') {
        return Some(without_comma.to_string());
    }
    let masked = mask_string_literals(trimmed);
    let caps = TRAILING_COMMA_BEFORE_FROM.captures_iter(&masked).last()?;
    let whole = caps.get(0)?;
    let from = caps.get(1)?;
    Some(format!(
        "{} {}",
        &trimmed[..whole.start()],
        &trimmed[from.start()..]
    ))
}

/// Fix: close unclosed parentheses
fn fix_unclosed_parens(sql: &str) -> Option<String> {
    let masked = mask_string_literals(sql);
    let open = masked.matches('(').count();
    let close = masked.matches(')').count();

    if open > close {
        let missing = open - close;
        if missing > MAX_PAREN_FIXES {
            return None;
        }
        let body = sql.trim_end().trim_end_matches(',');
        return Some(format!("{body}{}", ")".repeat(missing)));
    }

    None
}

/// Fix: give an empty SELECT list a placeholder projection
fn fix_incomplete_select(sql: &str) -> Option<String> {
    let masked = mask_string_literals(sql);
    let caps = EMPTY_SELECT_LIST.captures(&masked)?;
    let insert_at = caps.get(1).map_or(caps.get(0)?.start() + "SELECT".len(), |m| m.end());
    let mut fixed = sql.to_string();
    fixed.insert_str(insert_at, " 1 ");
    Some(fixed)
}

/// Fix: give a dangling FROM/JOIN/INTO/UPDATE a placeholder table
fn fix_incomplete_from(sql: &str) -> Option<String> {
    let trimmed = sql.trim_end();
    if DANGLING_FROM.is_match(trimmed) {
        return Some(format!("{trimmed} {PLACEHOLDER_TABLE}"));
    }
    None
}

/// True for table names introduced by the fixes above.
pub(crate) fn is_placeholder_table(name: &str) -> bool {
    name == PLACEHOLDER_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_parse_valid_sql() {
        let result = try_parse_for_completion("SELECT * FROM users WHERE id = 1", Dialect::Generic);
        let result = result.unwrap();
        assert_eq!(result.strategy, ParseStrategy::FullParse);
        assert_eq!(result.statements.len(), 1);
    }

    #[test]
    fn test_full_parse_invalid_sql() {
        assert!(try_full_parse("SELECT * FROM", Dialect::Generic).is_none());
    }

    #[test]
    fn test_truncated_parse_drops_open_clause() {
        let result = try_parse_for_completion("SELECT * FROM users WHERE ", Dialect::Generic);
        assert_eq!(result.unwrap().strategy, ParseStrategy::Truncated);
    }

    #[test]
    fn test_truncation_candidates_skip_literals() {
        let sql = "SELECT 'a WHERE b' FROM t WHERE ";
        let candidates = find_truncation_candidates(sql);
        assert!(candidates.iter().all(|&pos| sql.is_char_boundary(pos)));
        assert!(!candidates.contains(&"SELECT 'a".len()));
        assert!(candidates.contains(&"SELECT 'a WHERE b' FROM t".len()));
    }

    #[test]
    fn test_truncation_candidates_handle_unicode() {
        let sql = "SELECT μ, FROM users";
        for pos in find_truncation_candidates(sql) {
            assert!(sql.is_char_boundary(pos));
        }
    }

    #[test]
    fn test_fix_trailing_comma() {
        assert_eq!(
            fix_trailing_comma("SELECT a, FROM users").as_deref(),
            Some("SELECT a FROM users")
        );
        assert_eq!(fix_trailing_comma("SELECT a,").as_deref(), Some("SELECT a"));
        assert!(fix_trailing_comma("SELECT a FROM users").is_none());
    }

    #[test]
    fn test_fix_unclosed_parens() {
        let fixed = fix_unclosed_parens("SELECT COUNT(* FROM users").unwrap();
        assert!(fixed.ends_with(')'));
        assert!(fix_unclosed_parens("SELECT '(' FROM users").is_none());
    }

    #[test]
    fn test_fix_incomplete_select() {
        let fixed = fix_incomplete_select("SELECT FROM users").unwrap();
        assert!(fixed.contains(" 1 "));
        assert!(fixed.ends_with("FROM users"));
    }

    #[test]
    fn test_fix_incomplete_from() {
        let fixed = fix_incomplete_from("SELECT * FROM users JOIN ").unwrap();
        assert!(fixed.ends_with(PLACEHOLDER_TABLE));
        assert!(fix_incomplete_from("SELECT * FROM users").is_none());
    }

    #[test]
    fn test_dangling_from_uses_fixes() {
        let result = try_parse_for_completion("SELECT * FROM", Dialect::Generic).unwrap();
        assert_eq!(result.strategy, ParseStrategy::WithFixes);
    }

    #[test]
    fn test_whitespace_only_is_unavailable() {
        assert!(try_parse_for_completion("   ", Dialect::Generic).is_none());
    }
}
