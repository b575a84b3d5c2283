use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Clause-level position of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Select,
    From,
    Where,
    Join,
    Order,
    Group,
    Having,
    Insert,
    Update,
    Delete,
    #[default]
    General,
}

impl ContextType {
    /// Contexts in which a literal value may be typed.
    pub fn accepts_values(self) -> bool {
        matches!(
            self,
            ContextType::Where | ContextType::Insert | ContextType::Update
        )
    }
}

/// A table mentioned in the query so far.
///
/// `schema` and `table` hold unquoted identifier text for matching;
/// `original_text` keeps the reference exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTableRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    pub original_text: String,
}

impl NormalizedTableRef {
    pub fn new(schema: Option<String>, table: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            schema,
            table: table.into(),
            original_text: original_text.into(),
        }
    }

    /// Case-insensitive match against a catalog table. The schema is only
    /// compared when this reference specifies one.
    pub fn matches(&self, schema: &str, table: &str) -> bool {
        self.table.eq_ignore_ascii_case(table)
            && self
                .schema
                .as_deref()
                .map_or(true, |own| own.eq_ignore_ascii_case(schema))
    }

    pub fn binding(&self) -> TableBinding {
        TableBinding {
            schema: self.schema.clone(),
            table: self.table.clone(),
        }
    }
}

/// The table an alias is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
}

impl TableBinding {
    pub fn matches(&self, schema: &str, table: &str) -> bool {
        self.table.eq_ignore_ascii_case(table)
            && self
                .schema
                .as_deref()
                .map_or(true, |own| own.eq_ignore_ascii_case(schema))
    }
}

/// The cursor sits inside an open string literal tied to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValuePosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    /// `None` for positional INSERT values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Literal text typed so far, after the opening quote
    pub partial: String,
}

/// The cursor sits inside the argument list of a known function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunctionPosition {
    pub name: String,
    /// Zero-based index of the argument being typed
    pub param_index: usize,
}

/// Which extraction path produced the table references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum RefResolution {
    /// Structured parse of the pre-cursor text
    Structured,
    /// Pattern-based fallback
    #[default]
    Heuristic,
}

/// Everything the engine knows about the cursor for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CursorContext {
    pub text_before: String,
    pub text_after: String,
    pub current_word: String,
    pub context_type: ContextType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_character: Option<char>,
    pub is_after_trigger: bool,
    /// Identifier written before a `.` at the cursor (`u` in `u.em`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub table_refs: Vec<NormalizedTableRef>,
    pub aliases: BTreeMap<String, TableBinding>,
    pub cte_names: Vec<String>,
    /// INSERT/UPDATE target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_table: Option<NormalizedTableRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_position: Option<ValuePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_position: Option<FunctionPosition>,
    pub resolution: RefResolution,
}

impl CursorContext {
    /// Looks up a bound alias, ignoring ASCII case.
    pub fn alias(&self, name: &str) -> Option<&TableBinding> {
        self.aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, binding)| binding)
    }

    pub fn is_alias(&self, label: &str) -> bool {
        self.alias(label).is_some()
    }

    pub fn is_cte(&self, label: &str) -> bool {
        self.cte_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(label))
    }

    /// Alias bound to the given catalog table, if any. The first alias in
    /// sorted order wins when several are bound to the same table.
    pub fn alias_for(&self, schema: &str, table: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, binding)| binding.matches(schema, table))
            .map(|(alias, _)| alias.as_str())
    }
}
