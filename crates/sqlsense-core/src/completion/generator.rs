//! Candidate generation.
//!
//! Each context has a pure function producing its candidate list. Lists are
//! concatenated once, filtered against the word being typed and completed
//! with global keywords. Ranking happens afterwards.

use std::collections::HashSet;

use super::functions::function_suggestions;
use super::patterns::{always_quote, quote_ident, starts_with_ignore_case, LITERAL_QUOTE};
use crate::types::{
    ColumnInfo, ContextType, CursorContext, Suggestion, SuggestionKind, TableCatalogEntry,
    ValuePosition,
};

/// Keywords offered in every context.
const GLOBAL_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "LEFT JOIN",
    "INNER JOIN",
    "ON",
    "AND",
    "OR",
    "NOT",
    "NULL",
    "IS",
    "AS",
    "DISTINCT",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "WITH",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "BETWEEN",
    "LIKE",
    "IN",
    "EXISTS",
    "ASC",
    "DESC",
    "INSERT INTO",
    "VALUES",
    "UPDATE",
    "SET",
    "DELETE FROM",
];

/// Clauses that may follow a completed FROM item.
const NEXT_CLAUSE_KEYWORDS: &[&str] = &[
    "WHERE",
    "JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "INNER JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "GROUP BY",
    "ORDER BY",
    "LIMIT",
];

const FILTER_OPERATORS: &[&str] = &["=", "LIKE", "IN"];

const BOOLEAN_TYPES: &[&str] = &["bool", "boolean"];

/// The catalog a request is answered from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Catalog<'a> {
    pub tables: &'a [TableCatalogEntry],
    pub schema_names: &'a [String],
}

/// How column insert text is qualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnQualification {
    Bare,
    /// Alias when bound, else the quoted table path
    Reference,
    /// Always the quoted table path
    TablePath,
}

/// Decides whether a candidate label matches what has been typed.
struct WordFilter<'a> {
    word: &'a str,
    accept_all: bool,
}

impl<'a> WordFilter<'a> {
    fn new(ctx: &'a CursorContext) -> Self {
        Self {
            word: &ctx.current_word,
            accept_all: ctx.is_after_trigger || ctx.current_word.is_empty(),
        }
    }

    fn accepts(&self, label: &str) -> bool {
        self.accept_all || starts_with_ignore_case(label, self.word)
    }
}

/// Generates the unranked candidate list for a cursor context.
pub(crate) fn generate(ctx: &CursorContext, catalog: Catalog<'_>) -> Vec<Suggestion> {
    if let Some(position) = &ctx.value_position {
        return value_suggestions(position, &ctx.text_after, catalog);
    }

    let filter = WordFilter::new(ctx);

    if let Some(narrowed) = qualifier_suggestions(ctx, catalog) {
        return narrowed
            .into_iter()
            .filter(|suggestion| filter.accepts(&suggestion.label))
            .collect();
    }

    if ctx.function_position.is_some() {
        return referenced_column_suggestions(ctx, catalog)
            .into_iter()
            .filter(|suggestion| filter.accepts(&suggestion.label))
            .collect();
    }

    let mut suggestions: Vec<Suggestion> = context_candidates(ctx, catalog)
        .into_iter()
        .filter(|suggestion| filter.accepts(&suggestion.label))
        .collect();

    let present: HashSet<String> = suggestions.iter().map(|s| s.label.clone()).collect();
    suggestions.extend(
        GLOBAL_KEYWORDS
            .iter()
            .filter(|keyword| !present.contains(**keyword) && filter.accepts(keyword))
            .map(|keyword| Suggestion::keyword(keyword)),
    );
    suggestions
}

fn context_candidates(ctx: &CursorContext, catalog: Catalog<'_>) -> Vec<Suggestion> {
    match ctx.context_type {
        ContextType::Select => select_candidates(ctx, catalog),
        ContextType::From | ContextType::Join => from_candidates(ctx, catalog),
        ContextType::Where | ContextType::Order | ContextType::Group | ContextType::Having => {
            filter_clause_candidates(ctx, catalog)
        }
        ContextType::Insert => target_candidates(ctx, catalog, "VALUES"),
        ContextType::Update => target_candidates(ctx, catalog, "SET"),
        ContextType::Delete | ContextType::General => Vec::new(),
    }
}

fn select_candidates(ctx: &CursorContext, catalog: Catalog<'_>) -> Vec<Suggestion> {
    let mut candidates = cte_suggestions(ctx, "");
    candidates.extend(alias_suggestions(ctx));
    candidates.extend(function_suggestions().iter().cloned());
    candidates.extend(referenced_column_suggestions(ctx, catalog));
    candidates.push(Suggestion::keyword("DISTINCT"));
    candidates.push(Suggestion::keyword("*"));
    candidates
}

fn from_candidates(ctx: &CursorContext, catalog: Catalog<'_>) -> Vec<Suggestion> {
    let mut candidates = Vec::new();
    if ctx.context_type == ContextType::From && !ctx.table_refs.is_empty() {
        candidates.extend(NEXT_CLAUSE_KEYWORDS.iter().map(|kw| Suggestion::keyword(kw)));
    }
    candidates.extend(schema_suggestions(catalog));
    candidates.extend(cte_suggestions(ctx, " "));
    candidates.extend(table_suggestions(catalog.tables.iter(), true));
    candidates
}

fn filter_clause_candidates(ctx: &CursorContext, catalog: Catalog<'_>) -> Vec<Suggestion> {
    let mut candidates = alias_suggestions(ctx);
    // Without refs every catalog column applies. Refs missing from the
    // catalog yield no columns.
    if ctx.table_refs.is_empty() {
        candidates.extend(column_suggestions(
            ctx,
            catalog.tables.iter(),
            ColumnQualification::TablePath,
        ));
    } else {
        candidates.extend(column_suggestions(
            ctx,
            resolved_tables(ctx, catalog).into_iter(),
            reference_qualification(ctx),
        ));
    }
    candidates.extend(FILTER_OPERATORS.iter().map(|op| Suggestion::keyword(op)));
    candidates
}

/// INSERT and UPDATE: the target's columns when the target is known,
/// otherwise schemas and tables.
fn target_candidates(
    ctx: &CursorContext,
    catalog: Catalog<'_>,
    clause_keyword: &str,
) -> Vec<Suggestion> {
    let mut candidates = match &ctx.target_table {
        Some(target) => {
            let tables = catalog
                .tables
                .iter()
                .filter(|table| target.matches(&table.schema, &table.name));
            column_suggestions(ctx, tables, ColumnQualification::Bare)
        }
        None => {
            let mut candidates = schema_suggestions(catalog);
            candidates.extend(table_suggestions(catalog.tables.iter(), true));
            candidates
        }
    };
    candidates.push(Suggestion::keyword(clause_keyword));
    candidates
}

/// Columns of the catalog tables matching the resolved references.
fn referenced_column_suggestions(ctx: &CursorContext, catalog: Catalog<'_>) -> Vec<Suggestion> {
    let resolved = resolved_tables(ctx, catalog);
    column_suggestions(ctx, resolved.into_iter(), reference_qualification(ctx))
}

/// Narrowed candidates after `qualifier.`: the columns of the table it names
/// or the tables of the schema it names. `None` when it resolves to nothing.
fn qualifier_suggestions(ctx: &CursorContext, catalog: Catalog<'_>) -> Option<Vec<Suggestion>> {
    let qualifier = ctx.qualifier.as_deref()?;
    let expects_table = matches!(
        ctx.context_type,
        ContextType::From
            | ContextType::Join
            | ContextType::Insert
            | ContextType::Update
            | ContextType::Delete
    );

    if expects_table && is_schema(qualifier, catalog) {
        return Some(schema_table_suggestions(ctx, qualifier, catalog));
    }

    let tables: Vec<&TableCatalogEntry> = if let Some(binding) = ctx.alias(qualifier) {
        catalog
            .tables
            .iter()
            .filter(|table| binding.matches(&table.schema, &table.name))
            .collect()
    } else if let Some(table_ref) = ctx
        .table_refs
        .iter()
        .find(|table_ref| table_ref.table.eq_ignore_ascii_case(qualifier))
    {
        catalog
            .tables
            .iter()
            .filter(|table| table_ref.matches(&table.schema, &table.name))
            .collect()
    } else {
        catalog
            .tables
            .iter()
            .filter(|table| table.name.eq_ignore_ascii_case(qualifier))
            .collect()
    };

    if !tables.is_empty() || ctx.alias(qualifier).is_some() {
        return Some(column_suggestions(ctx, tables.into_iter(), ColumnQualification::Bare));
    }

    if is_schema(qualifier, catalog) {
        return Some(schema_table_suggestions(ctx, qualifier, catalog));
    }

    None
}

fn is_schema(name: &str, catalog: Catalog<'_>) -> bool {
    catalog
        .schema_names
        .iter()
        .any(|schema| schema.eq_ignore_ascii_case(name))
}

fn schema_table_suggestions(
    ctx: &CursorContext,
    schema: &str,
    catalog: Catalog<'_>,
) -> Vec<Suggestion> {
    let trailing_space = matches!(ctx.context_type, ContextType::From | ContextType::Join);
    catalog
        .tables
        .iter()
        .filter(|table| table.schema.eq_ignore_ascii_case(schema))
        .map(|table| {
            let mut insert_text = quote_ident(&table.name);
            if trailing_space {
                insert_text.push(' ');
            }
            Suggestion::new(&table.name, insert_text, SuggestionKind::Table)
                .with_detail(table.schema.clone())
        })
        .collect()
}

/// Catalog tables matched by at least one table reference, in catalog order.
fn resolved_tables<'a>(ctx: &CursorContext, catalog: Catalog<'a>) -> Vec<&'a TableCatalogEntry> {
    catalog
        .tables
        .iter()
        .filter(|table| {
            ctx.table_refs
                .iter()
                .any(|table_ref| table_ref.matches(&table.schema, &table.name))
        })
        .collect()
}

/// Number of distinct `(schema, table)` pairs referenced.
fn referenced_table_count(ctx: &CursorContext) -> usize {
    ctx.table_refs
        .iter()
        .map(|table_ref| {
            (
                table_ref.schema.as_deref().map(str::to_lowercase),
                table_ref.table.to_lowercase(),
            )
        })
        .collect::<HashSet<_>>()
        .len()
}

fn reference_qualification(ctx: &CursorContext) -> ColumnQualification {
    if referenced_table_count(ctx) > 1 {
        ColumnQualification::Reference
    } else {
        ColumnQualification::Bare
    }
}

fn column_suggestions<'a>(
    ctx: &CursorContext,
    tables: impl Iterator<Item = &'a TableCatalogEntry>,
    qualification: ColumnQualification,
) -> Vec<Suggestion> {
    tables
        .flat_map(|table| {
            let prefix = match qualification {
                ColumnQualification::Bare => None,
                ColumnQualification::Reference => Some(
                    ctx.alias_for(&table.schema, &table.name)
                        .map(quote_ident)
                        .unwrap_or_else(|| quoted_table_path(table)),
                ),
                ColumnQualification::TablePath => Some(quoted_table_path(table)),
            };
            table
                .columns()
                .iter()
                .map(move |column| column_suggestion(table, column, prefix.as_deref()))
        })
        .collect()
}

fn column_suggestion(
    table: &TableCatalogEntry,
    column: &ColumnInfo,
    prefix: Option<&str>,
) -> Suggestion {
    let name = quote_ident(&column.name);
    let insert_text = match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name,
    };
    let detail = if column.data_type.is_empty() {
        table.name.clone()
    } else {
        format!("{} ({})", column.data_type, table.name)
    };
    Suggestion::new(&column.name, insert_text, SuggestionKind::Column).with_detail(detail)
}

/// `"schema"."table"`, or `"table"` when the schema is empty.
fn quoted_table_path(table: &TableCatalogEntry) -> String {
    if table.schema.is_empty() {
        always_quote(&table.name)
    } else {
        format!("{}.{}", always_quote(&table.schema), always_quote(&table.name))
    }
}

fn table_suggestions<'a>(
    tables: impl Iterator<Item = &'a TableCatalogEntry>,
    trailing_space: bool,
) -> Vec<Suggestion> {
    tables
        .map(|table| {
            let mut insert_text = if table.schema.is_empty() {
                quote_ident(&table.name)
            } else {
                format!("{}.{}", quote_ident(&table.schema), quote_ident(&table.name))
            };
            if trailing_space {
                insert_text.push(' ');
            }
            let suggestion = Suggestion::new(&table.name, insert_text, SuggestionKind::Table);
            if table.schema.is_empty() {
                suggestion
            } else {
                suggestion.with_detail(table.schema.clone())
            }
        })
        .collect()
}

fn schema_suggestions(catalog: Catalog<'_>) -> Vec<Suggestion> {
    catalog
        .schema_names
        .iter()
        .map(|schema| {
            Suggestion::new(schema, format!("{}.", quote_ident(schema)), SuggestionKind::Schema)
        })
        .collect()
}

fn cte_suggestions(ctx: &CursorContext, suffix: &str) -> Vec<Suggestion> {
    ctx.cte_names
        .iter()
        .map(|name| {
            Suggestion::new(name, format!("{}{suffix}", quote_ident(name)), SuggestionKind::Table)
                .with_detail("CTE")
        })
        .collect()
}

fn alias_suggestions(ctx: &CursorContext) -> Vec<Suggestion> {
    ctx.aliases
        .iter()
        .map(|(alias, binding)| {
            Suggestion::new(alias, format!("{}.", quote_ident(alias)), SuggestionKind::Table)
                .with_detail(binding.table.clone())
        })
        .collect()
}

/// Known values of the column at a value position, filtered by the partial
/// literal. The insert text closes the quote unless it is already closed.
fn value_suggestions(
    position: &ValuePosition,
    text_after: &str,
    catalog: Catalog<'_>,
) -> Vec<Suggestion> {
    let Some(column_name) = position.column.as_deref() else {
        return Vec::new();
    };
    let Some(column) = catalog
        .tables
        .iter()
        .filter(|table| {
            table.name.eq_ignore_ascii_case(&position.table)
                && position
                    .schema
                    .as_deref()
                    .map_or(true, |schema| table.schema.eq_ignore_ascii_case(schema))
        })
        .flat_map(|table| table.columns())
        .find(|column| column.name.eq_ignore_ascii_case(column_name))
    else {
        return Vec::new();
    };

    let closes_quote = !text_after.starts_with(LITERAL_QUOTE);
    let booleans = BOOLEAN_TYPES
        .contains(&column.data_type.to_ascii_lowercase().as_str())
        .then_some(["true", "false"])
        .into_iter()
        .flatten()
        .map(str::to_string);

    let mut seen = HashSet::new();
    column
        .values
        .iter()
        .cloned()
        .chain(booleans)
        .filter(|value| starts_with_ignore_case(value, &position.partial))
        .filter(|value| seen.insert(value.clone()))
        .map(|value| {
            let mut insert_text = value.replace(LITERAL_QUOTE, "''");
            if closes_quote {
                insert_text.push(LITERAL_QUOTE);
            }
            Suggestion::new(value, insert_text, SuggestionKind::Value)
                .with_detail(column.name.clone())
        })
        .collect()
}
