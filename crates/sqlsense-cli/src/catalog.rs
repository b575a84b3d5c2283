//! Catalog loading from JSON files.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlsense_core::TableCatalogEntry;
use std::path::Path;

/// Tables and schema names offered to the completion engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub tables: Vec<TableCatalogEntry>,
    /// Explicit schema list; derived from the tables when absent
    pub schemas: Option<Vec<String>>,
}

/// Accepted file layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Tables(Vec<TableCatalogEntry>),
    Document {
        #[serde(default)]
        schemas: Option<Vec<String>>,
        #[serde(default)]
        tables: Vec<TableCatalogEntry>,
    },
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    parse_catalog(&content)
        .with_context(|| format!("Invalid catalog file: {}", path.display()))
}

/// Parse catalog JSON.
fn parse_catalog(content: &str) -> Result<Catalog> {
    let file: CatalogFile =
        serde_json::from_str(content).context("Catalog must be a table array or an object with `tables`")?;

    Ok(match file {
        CatalogFile::Tables(tables) => Catalog {
            tables,
            schemas: None,
        },
        CatalogFile::Document { schemas, tables } => Catalog { tables, schemas },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_table_array() {
        let catalog = parse_catalog(
            r#"[
                {"name": "users", "schema": "public", "columns": [{"name": "id", "type": "integer"}]},
                {"name": "events"}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.tables.len(), 2);
        assert_eq!(catalog.tables[0].columns()[0].name, "id");
        assert!(catalog.tables[1].columns().is_empty());
        assert!(catalog.schemas.is_none());
    }

    #[test]
    fn test_parse_document() {
        let catalog = parse_catalog(
            r#"{
                "schemas": ["public", "audit"],
                "tables": [{"name": "users", "schema": "public"}]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.schemas.unwrap(), vec!["public", "audit"]);
        assert_eq!(catalog.tables[0].name, "users");
    }

    #[test]
    fn test_parse_column_values() {
        let catalog = parse_catalog(
            r#"[{"name": "users", "schema": "public", "columns": [
                {"name": "status", "type": "varchar", "values": ["active", "inactive"]}
            ]}]"#,
        )
        .unwrap();
        assert_eq!(catalog.tables[0].columns()[0].values, vec!["active", "inactive"]);
    }

    #[test]
    fn test_invalid_catalog_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"tables\": 42}}").unwrap();

        let err = load_catalog(file.path()).unwrap_err();
        assert!(
            format!("{err:#}").contains("Invalid catalog file"),
            "unexpected error: {err:#}"
        );
    }
}
