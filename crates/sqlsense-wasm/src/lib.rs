//! WASM bindings for sqlsense-core.
//!
//! Every entry point takes a JSON request and returns JSON; nothing throws.

pub mod encoding;

use encoding::{cursor_to_utf8, Encoding};
use serde::{Deserialize, Serialize};
use sqlsense_core::{
    complete, completion_context, structured_parser_status, CompletionRequest, CursorContext,
    StructuredParserStatus, Suggestion,
};
use wasm_bindgen::prelude::*;

/// A completion request plus the encoding of its cursor offset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmRequest {
    #[serde(flatten)]
    request: CompletionRequest,
    #[serde(default)]
    encoding: Encoding,
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct SuggestionsResponse {
    suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorPayload>,
}

#[derive(Debug, Serialize)]
struct ContextResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<CursorContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorPayload>,
}

/// Module initialization: panic hook, optional console logging and the
/// structured parser (initialized inline since the host has no threads).
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    #[cfg(feature = "tracing")]
    tracing_wasm::set_as_global_default();
    sqlsense_core::init_structured_parser();
}

fn decode_request(request_json: &str) -> Result<CompletionRequest, ErrorPayload> {
    let WasmRequest {
        mut request,
        encoding,
    } = serde_json::from_str(request_json).map_err(|e| ErrorPayload {
        code: "REQUEST_PARSE_ERROR",
        message: format!("Invalid request format: {e}"),
    })?;

    request.cursor_offset =
        cursor_to_utf8(&request.query, request.cursor_offset, encoding).map_err(|message| {
            ErrorPayload {
                code: "CURSOR_ENCODING_ERROR",
                message,
            }
        })?;
    Ok(request)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":{"code":"SERIALIZATION_ERROR","message":"Failed to serialize result"}}"#.to_string())
}

/// Ranked suggestions for a JSON completion request.
///
/// Returns `{"suggestions": [...]}`; a malformed request yields an empty
/// list and an `error` object.
#[wasm_bindgen]
pub fn complete_json(request_json: &str) -> String {
    let response = match decode_request(request_json) {
        Ok(request) => SuggestionsResponse {
            suggestions: complete(&request),
            error: None,
        },
        Err(error) => SuggestionsResponse {
            suggestions: Vec::new(),
            error: Some(error),
        },
    };
    to_json(&response)
}

/// Cursor context for a JSON completion request, for debugging and custom UIs.
#[wasm_bindgen]
pub fn context_json(request_json: &str) -> String {
    let response = match decode_request(request_json) {
        Ok(request) => ContextResponse {
            context: Some(completion_context(&request)),
            error: None,
        },
        Err(error) => ContextResponse {
            context: None,
            error: Some(error),
        },
    };
    to_json(&response)
}

/// Whether suggestions currently benefit from the structured parser.
#[wasm_bindgen]
pub fn structured_parser_ready() -> bool {
    structured_parser_status() == StructuredParserStatus::Ready
}

/// Get version information
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_invalid_request() {
        let parsed: Value = serde_json::from_str(&complete_json(r#"{"cursorOffset": 0}"#)).unwrap();
        assert_eq!(parsed["suggestions"], serde_json::json!([]));
        assert_eq!(parsed["error"]["code"], "REQUEST_PARSE_ERROR");
    }

    #[test]
    fn test_keywords_without_catalog() {
        let parsed: Value =
            serde_json::from_str(&complete_json(r#"{"query": "SEL", "cursorOffset": 3}"#)).unwrap();
        assert_eq!(parsed["suggestions"][0]["label"], "SELECT");
        assert!(parsed.get("error").is_none());
    }

    #[test]
    fn test_bad_utf16_cursor() {
        let parsed: Value = serde_json::from_str(&context_json(
            r#"{"query": "SELECT", "cursorOffset": 40, "encoding": "utf16"}"#,
        ))
        .unwrap();
        assert_eq!(parsed["error"]["code"], "CURSOR_ENCODING_ERROR");
        assert!(parsed.get("context").is_none());
    }

    #[test]
    fn test_get_version() {
        assert!(!get_version().is_empty());
    }
}
