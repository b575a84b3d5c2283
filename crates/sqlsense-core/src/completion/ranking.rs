//! Suggestion ranking.
//!
//! Scores are additive:
//! - a base score looked up by context and suggestion kind
//! - the best match bonus of the label against the typed word
//! - context bonuses for referenced columns, CTE tables and aliases
//!
//! Ties are broken by kind precedence, then label, then insert text, so the
//! order is total and repeatable.

use std::cmp::Ordering;

use crate::types::{ContextType, CursorContext, Suggestion, SuggestionKind};

const SCORE_EXACT_MATCH: i32 = 300;
const SCORE_PREFIX_MATCH: i32 = 200;
const SCORE_CONTAINS_MATCH: i32 = 100;

/// Columns once any table is referenced
const SCORE_REFERENCED_COLUMN_BONUS: i32 = 100;
const SCORE_CTE_BONUS: i32 = 150;
const SCORE_ALIAS_BONUS: i32 = 150;

/// A suggestion paired with its score. Never leaves this module.
#[derive(Debug, Clone)]
struct ScoredSuggestion {
    suggestion: Suggestion,
    score: i32,
}

/// Base score for a kind in a context. Higher ranks first.
fn base_score(context: ContextType, kind: SuggestionKind) -> i32 {
    use SuggestionKind::{Column, Function, Keyword, Schema, Table, Value};

    match context {
        ContextType::Select => match kind {
            Function => 400,
            Column => 300,
            Keyword => 200,
            Table => 100,
            Schema | Value => 50,
        },
        ContextType::From | ContextType::Join => match kind {
            Table => 400,
            Schema => 300,
            Keyword => 200,
            Column => 100,
            Function => 50,
            Value => 0,
        },
        ContextType::Where
        | ContextType::Order
        | ContextType::Group
        | ContextType::Having
        | ContextType::Insert
        | ContextType::Update => match kind {
            Column => 400,
            Value => 300,
            Keyword => 200,
            Table => 100,
            Schema | Function => 50,
        },
        ContextType::Delete | ContextType::General => match kind {
            Keyword => 400,
            Table => 300,
            Schema => 250,
            Column => 200,
            Function => 100,
            Value => 50,
        },
    }
}

/// Bonus for how well `label` matches the typed `word`. Only the best
/// applicable bonus counts.
fn match_score(label: &str, word: &str) -> i32 {
    if word.is_empty() {
        return 0;
    }
    let label = label.to_lowercase();
    let word = word.to_lowercase();
    if label == word {
        SCORE_EXACT_MATCH
    } else if label.starts_with(&word) {
        SCORE_PREFIX_MATCH
    } else if label.contains(&word) {
        SCORE_CONTAINS_MATCH
    } else {
        0
    }
}

fn context_bonus(ctx: &CursorContext, suggestion: &Suggestion) -> i32 {
    let mut bonus = 0;
    match suggestion.kind {
        SuggestionKind::Column if !ctx.table_refs.is_empty() => {
            bonus += SCORE_REFERENCED_COLUMN_BONUS;
        }
        SuggestionKind::Table if ctx.is_cte(&suggestion.label) => bonus += SCORE_CTE_BONUS,
        _ => {}
    }
    if ctx.is_alias(&suggestion.label) {
        bonus += SCORE_ALIAS_BONUS;
    }
    bonus
}

fn score(ctx: &CursorContext, suggestion: &Suggestion) -> i32 {
    base_score(ctx.context_type, suggestion.kind)
        .saturating_add(match_score(&suggestion.label, &ctx.current_word))
        .saturating_add(context_bonus(ctx, suggestion))
}

fn compare(a: &ScoredSuggestion, b: &ScoredSuggestion) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| {
            a.suggestion
                .kind
                .precedence()
                .cmp(&b.suggestion.kind.precedence())
        })
        .then_with(|| {
            a.suggestion
                .label
                .to_lowercase()
                .cmp(&b.suggestion.label.to_lowercase())
        })
        .then_with(|| a.suggestion.insert_text.cmp(&b.suggestion.insert_text))
}

/// Scores, sorts and truncates suggestions to at most `max_results`.
pub(crate) fn rank(
    ctx: &CursorContext,
    suggestions: Vec<Suggestion>,
    max_results: usize,
) -> Vec<Suggestion> {
    let mut scored: Vec<ScoredSuggestion> = suggestions
        .into_iter()
        .map(|suggestion| ScoredSuggestion {
            score: score(ctx, &suggestion),
            suggestion,
        })
        .collect();
    scored.sort_by(compare);
    scored.truncate(max_results);
    scored.into_iter().map(|scored| scored.suggestion).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NormalizedTableRef, TableBinding};

    fn column(label: &str) -> Suggestion {
        Suggestion::new(label, label, SuggestionKind::Column)
    }

    fn table(label: &str) -> Suggestion {
        Suggestion::new(label, label, SuggestionKind::Table)
    }

    fn labels(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.label.as_str()).collect()
    }

    #[test]
    fn test_match_score_uses_best_bonus() {
        assert_eq!(match_score("users", ""), 0);
        assert_eq!(match_score("Users", "users"), SCORE_EXACT_MATCH);
        assert_eq!(match_score("user_id", "USER"), SCORE_PREFIX_MATCH);
        assert_eq!(match_score("order_user", "user"), SCORE_CONTAINS_MATCH);
        assert_eq!(match_score("orders", "x"), 0);
    }

    #[test]
    fn test_base_scores_follow_context() {
        assert!(
            base_score(ContextType::Select, SuggestionKind::Function)
                > base_score(ContextType::Select, SuggestionKind::Column)
        );
        assert!(
            base_score(ContextType::From, SuggestionKind::Table)
                > base_score(ContextType::From, SuggestionKind::Schema)
        );
        assert!(
            base_score(ContextType::Where, SuggestionKind::Value)
                > base_score(ContextType::Where, SuggestionKind::Keyword)
        );
        assert!(
            base_score(ContextType::General, SuggestionKind::Keyword)
                > base_score(ContextType::General, SuggestionKind::Table)
        );
    }

    #[test]
    fn test_where_ranks_columns_before_keywords() {
        let ctx = CursorContext {
            context_type: ContextType::Where,
            ..CursorContext::default()
        };
        let ranked = rank(
            &ctx,
            vec![Suggestion::keyword("AND"), column("name"), table("users")],
            50,
        );
        assert_eq!(labels(&ranked), vec!["name", "AND", "users"]);
    }

    #[test]
    fn test_exact_keyword_match_ties_with_column_prefix() {
        let ctx = CursorContext {
            context_type: ContextType::Select,
            current_word: "from".to_string(),
            ..CursorContext::default()
        };
        let ranked = rank(
            &ctx,
            vec![column("from_date"), Suggestion::keyword("FROM")],
            50,
        );
        assert_eq!(labels(&ranked), vec!["FROM", "from_date"]);
    }

    #[test]
    fn test_cte_and_alias_bonuses() {
        let mut ctx = CursorContext {
            context_type: ContextType::From,
            cte_names: vec!["recent".to_string()],
            ..CursorContext::default()
        };
        ctx.aliases.insert(
            "u".to_string(),
            TableBinding {
                schema: None,
                table: "users".to_string(),
            },
        );
        let ranked = rank(&ctx, vec![table("accounts"), table("recent"), table("u")], 50);
        assert_eq!(labels(&ranked), vec!["recent", "u", "accounts"]);
    }

    #[test]
    fn test_referenced_column_bonus() {
        let bare = CursorContext {
            context_type: ContextType::Select,
            ..CursorContext::default()
        };
        let referenced = CursorContext {
            table_refs: vec![NormalizedTableRef::new(None, "users", "users")],
            ..bare.clone()
        };
        assert_eq!(
            score(&referenced, &column("id")),
            score(&bare, &column("id")) + SCORE_REFERENCED_COLUMN_BONUS
        );
        assert_eq!(score(&referenced, &table("id")), score(&bare, &table("id")));
    }

    #[test]
    fn test_ties_break_by_precedence_label_and_insert_text() {
        let ctx = CursorContext::default();
        let ranked = rank(
            &ctx,
            vec![
                Suggestion::new("b", "x.b", SuggestionKind::Column),
                Suggestion::new("B", "a.b", SuggestionKind::Column),
                Suggestion::new("a", "a", SuggestionKind::Value),
                Suggestion::new("z", "z", SuggestionKind::Column),
            ],
            50,
        );
        let inserted: Vec<&str> = ranked.iter().map(|s| s.insert_text.as_str()).collect();
        assert_eq!(inserted, vec!["a.b", "x.b", "z", "a"]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let ctx = CursorContext::default();
        let suggestions: Vec<Suggestion> = (0..10).map(|i| column(&format!("c{i}"))).collect();
        assert_eq!(rank(&ctx, suggestions.clone(), 3).len(), 3);
        assert!(rank(&ctx, suggestions, 0).is_empty());
    }
}
