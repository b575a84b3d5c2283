//! UTF-16 to UTF-8 cursor conversion for the WASM API.
//!
//! JavaScript editors (Monaco, CodeMirror) report cursor positions in UTF-16
//! code units, while the engine works with UTF-8 byte offsets.

use serde::{Deserialize, Serialize};

/// Text encoding of the request's `cursorOffset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8 byte offsets (default)
    #[default]
    Utf8,
    /// UTF-16 code unit offsets (for JavaScript consumers)
    Utf16,
}

/// Convert a UTF-16 code unit offset to a UTF-8 byte offset.
///
/// # Returns
/// * `Ok(byte_offset)` - The corresponding UTF-8 byte offset
/// * `Err(message)` - If the offset is out of bounds or splits a surrogate pair
pub fn utf16_to_utf8_offset(query: &str, utf16_offset: usize) -> Result<usize, String> {
    let mut utf16_count = 0;
    let mut byte_offset = 0;

    for ch in query.chars() {
        if utf16_count == utf16_offset {
            return Ok(byte_offset);
        }
        if utf16_count > utf16_offset {
            return Err(format!(
                "UTF-16 offset {utf16_offset} falls inside a surrogate pair"
            ));
        }
        // Characters outside the BMP take 2 UTF-16 code units
        utf16_count += ch.len_utf16();
        byte_offset += ch.len_utf8();
    }

    if utf16_count == utf16_offset {
        return Ok(byte_offset);
    }
    if utf16_count > utf16_offset {
        return Err(format!(
            "UTF-16 offset {utf16_offset} falls inside a surrogate pair"
        ));
    }

    Err(format!(
        "UTF-16 offset {utf16_offset} exceeds query length (max: {utf16_count})"
    ))
}

/// Cursor offset in UTF-8 bytes for a request sent with `encoding`.
pub fn cursor_to_utf8(query: &str, cursor_offset: usize, encoding: Encoding) -> Result<usize, String> {
    match encoding {
        Encoding::Utf8 => Ok(cursor_offset),
        Encoding::Utf16 => utf16_to_utf8_offset(query, cursor_offset),
    }
}
