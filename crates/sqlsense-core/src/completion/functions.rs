//! Built-in SQL function catalog.
//!
//! A curated, dialect-neutral list of common functions with display
//! signatures. Suggestions are pre-built once using `LazyLock` and cloned per
//! request. The same list decides whether a name before `(` starts a
//! function argument list.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::{Suggestion, SuggestionKind};

use FunctionCategory::{Aggregate, Scalar, Window};

/// Broad classification of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCategory {
    Aggregate,
    Window,
    Scalar,
}

/// A function known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSpec {
    /// Display name, upper case
    pub name: &'static str,
    /// Signature shown as suggestion detail
    pub signature: &'static str,
    pub category: FunctionCategory,
}

const fn func(
    name: &'static str,
    signature: &'static str,
    category: FunctionCategory,
) -> FunctionSpec {
    FunctionSpec {
        name,
        signature,
        category,
    }
}

static FUNCTIONS: &[FunctionSpec] = &[
    // Aggregates
    func("ARRAY_AGG", "ARRAY_AGG(expr) → ARRAY", Aggregate),
    func("AVG", "AVG(expr) → NUMERIC", Aggregate),
    func("BOOL_AND", "BOOL_AND(expr) → BOOLEAN", Aggregate),
    func("BOOL_OR", "BOOL_OR(expr) → BOOLEAN", Aggregate),
    func("COUNT", "COUNT(expr) → INTEGER", Aggregate),
    func("MAX", "MAX(expr) → ANY", Aggregate),
    func("MIN", "MIN(expr) → ANY", Aggregate),
    func("STRING_AGG", "STRING_AGG(expr, delimiter) → TEXT", Aggregate),
    func("SUM", "SUM(expr) → NUMERIC", Aggregate),
    // Window
    func("DENSE_RANK", "DENSE_RANK() → INTEGER", Window),
    func("FIRST_VALUE", "FIRST_VALUE(expr) → ANY", Window),
    func("LAG", "LAG(expr, offset, default) → ANY", Window),
    func("LAST_VALUE", "LAST_VALUE(expr) → ANY", Window),
    func("LEAD", "LEAD(expr, offset, default) → ANY", Window),
    func("NTILE", "NTILE(buckets) → INTEGER", Window),
    func("RANK", "RANK() → INTEGER", Window),
    func("ROW_NUMBER", "ROW_NUMBER() → INTEGER", Window),
    // Scalar
    func("ABS", "ABS(number) → NUMERIC", Scalar),
    func("CAST", "CAST(expr AS type) → ANY", Scalar),
    func("CEIL", "CEIL(number) → NUMERIC", Scalar),
    func("COALESCE", "COALESCE(value, ...) → ANY", Scalar),
    func("CONCAT", "CONCAT(text, ...) → TEXT", Scalar),
    func("CURRENT_DATE", "CURRENT_DATE → DATE", Scalar),
    func("CURRENT_TIMESTAMP", "CURRENT_TIMESTAMP → TIMESTAMP", Scalar),
    func("DATE_PART", "DATE_PART(field, source) → NUMERIC", Scalar),
    func("DATE_TRUNC", "DATE_TRUNC(field, source) → TIMESTAMP", Scalar),
    func("EXTRACT", "EXTRACT(field FROM source) → NUMERIC", Scalar),
    func("FLOOR", "FLOOR(number) → NUMERIC", Scalar),
    func("GREATEST", "GREATEST(value, ...) → ANY", Scalar),
    func("LEAST", "LEAST(value, ...) → ANY", Scalar),
    func("LENGTH", "LENGTH(text) → INTEGER", Scalar),
    func("LOWER", "LOWER(text) → TEXT", Scalar),
    func("LTRIM", "LTRIM(text) → TEXT", Scalar),
    func("NOW", "NOW() → TIMESTAMP", Scalar),
    func("NULLIF", "NULLIF(value1, value2) → ANY", Scalar),
    func("POSITION", "POSITION(substring IN text) → INTEGER", Scalar),
    func("REPLACE", "REPLACE(text, from, to) → TEXT", Scalar),
    func("ROUND", "ROUND(number, digits) → NUMERIC", Scalar),
    func("RTRIM", "RTRIM(text) → TEXT", Scalar),
    func("SPLIT_PART", "SPLIT_PART(text, delimiter, n) → TEXT", Scalar),
    func("SUBSTRING", "SUBSTRING(text, start, length) → TEXT", Scalar),
    func("TO_CHAR", "TO_CHAR(value, format) → TEXT", Scalar),
    func("TO_DATE", "TO_DATE(text, format) → DATE", Scalar),
    func("TRIM", "TRIM(text) → TEXT", Scalar),
    func("UPPER", "UPPER(text) → TEXT", Scalar),
];

/// Functions written without parentheses.
const KEYWORD_STYLE_FUNCTIONS: &[&str] = &["CURRENT_DATE", "CURRENT_TIMESTAMP"];

/// Lookup by lower-cased name.
static FUNCTION_INDEX: LazyLock<HashMap<String, &'static FunctionSpec>> = LazyLock::new(|| {
    FUNCTIONS
        .iter()
        .map(|spec| (spec.name.to_ascii_lowercase(), spec))
        .collect()
});

/// Pre-built suggestions in catalog order.
static FUNCTION_SUGGESTIONS: LazyLock<Vec<Suggestion>> =
    LazyLock::new(|| FUNCTIONS.iter().map(function_suggestion).collect());

/// All known functions.
pub fn all_functions() -> &'static [FunctionSpec] {
    FUNCTIONS
}

/// Looks up a function by name, ignoring case.
pub fn lookup_function(name: &str) -> Option<&'static FunctionSpec> {
    FUNCTION_INDEX.get(&name.to_ascii_lowercase()).copied()
}

pub fn is_known_function(name: &str) -> bool {
    lookup_function(name).is_some()
}

/// Function suggestions, one per known function.
pub(crate) fn function_suggestions() -> &'static [Suggestion] {
    &FUNCTION_SUGGESTIONS
}

fn uses_keyword_call_style(spec: &FunctionSpec) -> bool {
    KEYWORD_STYLE_FUNCTIONS.contains(&spec.name)
}

fn function_suggestion(spec: &FunctionSpec) -> Suggestion {
    let insert_text = if uses_keyword_call_style(spec) {
        spec.name.to_string()
    } else {
        format!("{}(", spec.name)
    };
    Suggestion::new(spec.name, insert_text, SuggestionKind::Function).with_detail(spec.signature)
}
