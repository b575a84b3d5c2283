//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// sqlsense - cursor-aware SQL completion
#[derive(Parser, Debug)]
#[command(name = "sqlsense")]
#[command(about = "Suggest completions for a SQL query at a cursor position", long_about = None)]
#[command(version)]
pub struct Args {
    /// File containing the query (reads from stdin if neither FILE nor --query is given)
    #[arg(value_name = "FILE", conflicts_with = "query")]
    pub file: Option<PathBuf>,

    /// Query text
    #[arg(short = 'e', long, value_name = "SQL")]
    pub query: Option<String>,

    /// Catalog JSON: an array of tables or an object with `schemas` and `tables`
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Cursor byte offset (defaults to the marker position, else the end of the query)
    #[arg(long, value_name = "OFFSET")]
    pub cursor: Option<usize>,

    /// Cursor marker removed from the query when --cursor is not given
    #[arg(long, default_value = "|", value_name = "TEXT")]
    pub marker: String,

    /// SQL dialect
    #[arg(short, long, default_value = "generic", value_enum)]
    pub dialect: DialectArg,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Print the cursor context instead of suggestions
    #[arg(long)]
    pub context: bool,

    /// Maximum number of suggestions
    #[arg(short = 'n', long, default_value_t = sqlsense_core::DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    /// Skip the structured parser and use pattern-based extraction only
    #[arg(long)]
    pub no_structured: bool,

    /// Print the JSON schema of a completion request and exit
    #[arg(long)]
    pub request_schema: bool,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,
}

/// SQL dialect options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
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

impl From<DialectArg> for sqlsense_core::Dialect {
    fn from(d: DialectArg) -> Self {
        match d {
            DialectArg::Generic => sqlsense_core::Dialect::Generic,
            DialectArg::Ansi => sqlsense_core::Dialect::Ansi,
            DialectArg::Bigquery => sqlsense_core::Dialect::Bigquery,
            DialectArg::Clickhouse => sqlsense_core::Dialect::Clickhouse,
            DialectArg::Databricks => sqlsense_core::Dialect::Databricks,
            DialectArg::Duckdb => sqlsense_core::Dialect::Duckdb,
            DialectArg::Hive => sqlsense_core::Dialect::Hive,
            DialectArg::Mssql => sqlsense_core::Dialect::Mssql,
            DialectArg::Mysql => sqlsense_core::Dialect::Mysql,
            DialectArg::Postgres => sqlsense_core::Dialect::Postgres,
            DialectArg::Redshift => sqlsense_core::Dialect::Redshift,
            DialectArg::Snowflake => sqlsense_core::Dialect::Snowflake,
            DialectArg::Sqlite => sqlsense_core::Dialect::Sqlite,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
}
