//! Human-readable table output formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqlsense_core::{CursorContext, Suggestion};
use std::fmt::Write;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Format ranked suggestions as a table with optional colors.
pub fn format_table(suggestions: &[Suggestion], use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    if suggestions.is_empty() {
        let message = "No suggestions";
        if colored {
            writeln!(out, "{}", message.dimmed()).unwrap();
        } else {
            writeln!(out, "{message}").unwrap();
        }
        return out;
    }

    let mut builder = Builder::default();
    builder.push_record(["#", "Label", "Kind", "Insert", "Detail"]);
    for (index, suggestion) in suggestions.iter().enumerate() {
        builder.push_record([
            (index + 1).to_string(),
            suggestion.label.clone(),
            suggestion.kind.as_str().to_string(),
            suggestion.insert_text.clone(),
            suggestion.detail.clone().unwrap_or_default(),
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();

    writeln!(out, "{table}").unwrap();
    let footer = format!("{} suggestion(s)", suggestions.len());
    if colored {
        writeln!(out, "{}", footer.dimmed()).unwrap();
    } else {
        writeln!(out, "{footer}").unwrap();
    }

    out
}

/// Format the derived cursor context as labelled lines.
pub fn format_context(ctx: &CursorContext, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    let refs: Vec<&str> = ctx
        .table_refs
        .iter()
        .map(|r| r.original_text.as_str())
        .collect();
    let aliases: Vec<String> = ctx
        .aliases
        .iter()
        .map(|(alias, binding)| match &binding.schema {
            Some(schema) => format!("{alias} -> {schema}.{}", binding.table),
            None => format!("{alias} -> {}", binding.table),
        })
        .collect();

    let mut rows: Vec<(&str, String)> = vec![
        ("Context", format!("{:?}", ctx.context_type).to_lowercase()),
        ("Word", ctx.current_word.clone()),
        ("Tables", refs.join(", ")),
        ("Aliases", aliases.join(", ")),
        ("CTEs", ctx.cte_names.join(", ")),
        ("Resolution", format!("{:?}", ctx.resolution).to_lowercase()),
    ];
    if let Some(qualifier) = &ctx.qualifier {
        rows.push(("Qualifier", qualifier.clone()));
    }
    if let Some(target) = &ctx.target_table {
        rows.push(("Target", target.original_text.clone()));
    }
    if let Some(value) = &ctx.value_position {
        let column = value.column.as_deref().unwrap_or("?");
        rows.push(("Value", format!("{}.{column} '{}'", value.table, value.partial)));
    }
    if let Some(function) = &ctx.function_position {
        rows.push((
            "Function",
            format!("{} (argument {})", function.name, function.param_index),
        ));
    }

    for (label, value) in rows {
        let label = format!("{label:<11}");
        if colored {
            writeln!(out, "{}{value}", label.cyan()).unwrap();
        } else {
            writeln!(out, "{label}{value}").unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlsense_core::{completion_context, CompletionRequest, SuggestionKind};

    #[test]
    fn test_table_lists_suggestions() {
        let suggestions = vec![
            Suggestion::new("email", "email", SuggestionKind::Column).with_detail("varchar (users)"),
            Suggestion::keyword("WHERE"),
        ];
        let output = format_table(&suggestions, false);
        assert!(output.contains("Label"));
        assert!(output.contains("varchar (users)"));
        assert!(output.contains("keyword"));
        assert!(output.contains("2 suggestion(s)"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_table(&[], false), "No suggestions\n");
    }

    #[test]
    fn test_context_lines() {
        let query = "SELECT * FROM users WHERE ";
        let mut request = CompletionRequest::new(query, query.len(), vec![]);
        request.options.structured_parse = false;
        let output = format_context(&completion_context(&request), false);
        assert!(output.contains("Context    where"));
        assert!(output.contains("Tables     users"));
        assert!(output.contains("Resolution heuristic"));
    }
}
