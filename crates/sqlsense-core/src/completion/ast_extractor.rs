//! Context extraction from a parsed statement.
//!
//! Collects what completion needs from the statement the cursor is in:
//! referenced tables with their aliases, CTE names and the INSERT/UPDATE
//! target. Nested joins and derived subqueries are walked as well.

use sqlparser::ast::{
    FromTable, ObjectName, Query, Select, SetExpr, Statement, TableFactor, TableWithJoins,
    UpdateTableFromKind,
};

use super::adapter::StructuredContext;
use super::parse_strategies::is_placeholder_table;
use super::patterns::normalize_table_ref;
use crate::types::NormalizedTableRef;

/// Maximum recursion depth for AST traversal.
const MAX_EXTRACTION_DEPTH: usize = 50;

/// Walks a single statement.
pub(crate) fn extract_statement_context(stmt: &Statement) -> StructuredContext {
    let mut ctx = StructuredContext::default();
    extract_from_statement(stmt, &mut ctx, 0);
    ctx
}

fn extract_from_statement(stmt: &Statement, ctx: &mut StructuredContext, depth: usize) {
    match stmt {
        Statement::Query(query) => extract_from_query(query, ctx, depth),
        Statement::Insert(insert) => {
            ctx.target_table = normalize_table_ref(&insert.table.to_string())
                .filter(|table_ref| !is_placeholder_table(&table_ref.table));
            if let Some(source) = &insert.source {
                extract_from_query(source, ctx, depth);
            }
        }
        Statement::Update { table, from, .. } => {
            if let TableFactor::Table { name, .. } = &table.relation {
                ctx.target_table = object_name_ref(name);
            }
            extract_from_table_with_joins(table, ctx, depth);
            if let Some(
                UpdateTableFromKind::BeforeSet(tables) | UpdateTableFromKind::AfterSet(tables),
            ) = from
            {
                for twj in tables {
                    extract_from_table_with_joins(twj, ctx, depth);
                }
            }
        }
        Statement::Delete(delete) => {
            for name in &delete.tables {
                if let Some(table_ref) = object_name_ref(name) {
                    ctx.table_refs.push(table_ref);
                }
            }
            let (FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables)) =
                &delete.from;
            for twj in tables.iter().chain(delete.using.iter().flatten()) {
                extract_from_table_with_joins(twj, ctx, depth);
            }
        }
        _ => {}
    }
}

fn extract_from_query(query: &Query, ctx: &mut StructuredContext, depth: usize) {
    if depth > MAX_EXTRACTION_DEPTH {
        return;
    }

    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            let name = cte.alias.name.value.clone();
            if !ctx.cte_names.contains(&name) {
                ctx.cte_names.push(name);
            }
        }
        // CTE bodies are scanned for names only; their tables are not in
        // scope of the outer query.
    }

    extract_from_set_expr(&query.body, ctx, depth + 1);
}

fn extract_from_set_expr(set_expr: &SetExpr, ctx: &mut StructuredContext, depth: usize) {
    if depth > MAX_EXTRACTION_DEPTH {
        return;
    }

    match set_expr {
        SetExpr::Select(select) => extract_from_select(select, ctx, depth),
        SetExpr::Query(query) => extract_from_query(query, ctx, depth),
        SetExpr::SetOperation { right, .. } => {
            // The cursor is in the last operand.
            extract_from_set_expr(right, ctx, depth + 1);
        }
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => {
            extract_from_statement(stmt, ctx, depth + 1);
        }
        _ => {}
    }
}

fn extract_from_select(select: &Select, ctx: &mut StructuredContext, depth: usize) {
    for twj in &select.from {
        extract_from_table_with_joins(twj, ctx, depth);
    }
}

fn extract_from_table_with_joins(
    twj: &TableWithJoins,
    ctx: &mut StructuredContext,
    depth: usize,
) {
    if depth > MAX_EXTRACTION_DEPTH {
        return;
    }

    extract_from_table_factor(&twj.relation, ctx, depth);
    for join in &twj.joins {
        extract_from_table_factor(&join.relation, ctx, depth);
    }
}

fn extract_from_table_factor(tf: &TableFactor, ctx: &mut StructuredContext, depth: usize) {
    if depth > MAX_EXTRACTION_DEPTH {
        return;
    }

    match tf {
        TableFactor::Table { name, alias, .. } => {
            let Some(table_ref) = object_name_ref(name) else {
                return;
            };
            if let Some(alias) = alias {
                ctx.aliases
                    .insert(alias.name.value.clone(), table_ref.binding());
            }
            ctx.table_refs.push(table_ref);
        }
        TableFactor::Derived { subquery, .. } => {
            extract_from_query(subquery, ctx, depth + 1);
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            extract_from_table_with_joins(table_with_joins, ctx, depth + 1);
        }
        _ => {}
    }
}

/// Converts an object name into a table reference, keeping the last two
/// identifier parts as schema and table.
fn object_name_ref(name: &ObjectName) -> Option<NormalizedTableRef> {
    let mut parts: Vec<String> = name
        .0
        .iter()
        .filter_map(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .collect();
    let table = parts.pop().filter(|table| !table.is_empty())?;
    if is_placeholder_table(&table) {
        return None;
    }
    let schema = parts.pop();
    Some(NormalizedTableRef::new(schema, table, name.to_string()))
}
