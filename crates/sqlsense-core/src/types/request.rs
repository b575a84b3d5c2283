//! Request types for the completion API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// Maximum query size (10MB) accepted by the engine.
pub const MAX_QUERY_LENGTH: usize = 10 * 1024 * 1024;

/// Default number of suggestions returned per request.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Default minimum pre-cursor length before a structured parse is attempted.
pub const DEFAULT_MIN_PARSE_LENGTH: usize = 10;

/// A request for completion suggestions at a cursor position.
///
/// The catalog is supplied by the caller on every request and is never cached
/// or mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// The full query text as currently typed (usually incomplete)
    pub query: String,

    /// Byte offset of the cursor in `query`
    pub cursor_offset: usize,

    /// Tables known to the catalog, with their columns
    #[serde(default)]
    pub catalog_tables: Vec<TableCatalogEntry>,

    /// Schema names known to the catalog. Derived from `catalog_tables` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_names: Option<Vec<String>>,

    /// Engine tuning options
    #[serde(default)]
    pub options: CompletionOptions,
}

impl CompletionRequest {
    /// Creates a request with default options and no explicit schema list.
    pub fn new(
        query: impl Into<String>,
        cursor_offset: usize,
        catalog_tables: Vec<TableCatalogEntry>,
    ) -> Self {
        Self {
            query: query.into(),
            cursor_offset,
            catalog_tables,
            schema_names: None,
            options: CompletionOptions::default(),
        }
    }

    /// Decodes a request from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CompletionError> {
        serde_json::from_str(json).map_err(CompletionError::InvalidRequest)
    }

    /// Checks the request bounds without clamping anything.
    pub fn validate(&self) -> Result<(), CompletionError> {
        let len = self.query.len();
        if len > MAX_QUERY_LENGTH {
            return Err(CompletionError::QueryTooLarge {
                len,
                max: MAX_QUERY_LENGTH,
            });
        }
        if self.cursor_offset > len {
            return Err(CompletionError::CursorOutOfBounds {
                offset: self.cursor_offset,
                len,
            });
        }
        if !self.query.is_char_boundary(self.cursor_offset) {
            return Err(CompletionError::CursorNotCharBoundary {
                offset: self.cursor_offset,
            });
        }
        Ok(())
    }

    /// Schema names to offer, falling back to the distinct schemas of the catalog.
    pub fn effective_schema_names(&self) -> Vec<String> {
        if let Some(names) = &self.schema_names {
            return names.clone();
        }
        let mut names: Vec<String> = self
            .catalog_tables
            .iter()
            .filter(|table| !table.schema.is_empty())
            .map(|table| table.schema.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// A table as described by the catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableCatalogEntry {
    pub name: String,
    #[serde(default)]
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnInfo>>,
}

impl TableCatalogEntry {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Some(columns),
        }
    }

    /// Columns of the table, empty when the provider did not load them.
    pub fn columns(&self) -> &[ColumnInfo] {
        self.columns.as_deref().unwrap_or_default()
    }
}

/// A column as described by the catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,

    /// Declared data type (e.g. `integer`, `varchar`)
    #[serde(rename = "type", default)]
    pub data_type: String,

    /// Known literal values (enum labels, small lookup domains) offered at value positions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            values: Vec::new(),
        }
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Options controlling completion behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionOptions {
    /// Maximum number of suggestions returned (default 50)
    pub max_results: usize,

    /// Dialect used by the structured parser
    pub dialect: Dialect,

    /// Allow the structured parser to be consulted when it is ready (default true)
    pub structured_parse: bool,

    /// Minimum trimmed pre-cursor length before a structured parse is attempted
    pub min_parse_length: usize,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            dialect: Dialect::default(),
            structured_parse: true,
            min_parse_length: DEFAULT_MIN_PARSE_LENGTH,
        }
    }
}

/// SQL dialect used when the structured parser is consulted.
///
/// The heuristic path is dialect-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    Mysql,
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    #[cfg(feature = "structured-parse")]
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, DuckDbDialect,
            GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Bigquery => Box::new(BigQueryDialect {}),
            Self::Clickhouse => Box::new(ClickHouseDialect {}),
            Self::Databricks => Box::new(DatabricksDialect {}),
            Self::Duckdb => Box::new(DuckDbDialect {}),
            Self::Hive => Box::new(HiveDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Redshift => Box::new(RedshiftSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }
}
