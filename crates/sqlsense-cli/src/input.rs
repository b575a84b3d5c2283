//! Query input handling: `--query`, a file, or stdin, plus cursor placement.

use anyhow::{bail, Context, Result};
use std::io::{self, Read};
use std::path::Path;

/// Read the query from `--query`, a file, or stdin, in that order.
///
/// A single trailing newline from a file or stdin is dropped so that the
/// default cursor lands on the last line rather than after it.
pub fn read_query(query: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(query) = query {
        return Ok(query.to_string());
    }

    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read from stdin")?;
            content
        }
    };

    Ok(strip_trailing_newline(content))
}

fn strip_trailing_newline(mut content: String) -> String {
    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }
    content
}

/// Resolve the cursor position.
///
/// An explicit offset must lie within the query on a character boundary.
/// Without one, the first occurrence of `marker` is removed and its position
/// becomes the cursor; without a marker the cursor is at the end.
pub fn place_cursor(query: String, cursor: Option<usize>, marker: &str) -> Result<(String, usize)> {
    if let Some(offset) = cursor {
        if offset > query.len() {
            bail!(
                "cursor offset {offset} is past the end of the query ({} bytes)",
                query.len()
            );
        }
        if !query.is_char_boundary(offset) {
            bail!("cursor offset {offset} is not on a character boundary");
        }
        return Ok((query, offset));
    }

    if !marker.is_empty() {
        if let Some(offset) = query.find(marker) {
            let cleaned = query.replacen(marker, "", 1);
            return Ok((cleaned, offset));
        }
    }

    let end = query.len();
    Ok((query, end))
}
