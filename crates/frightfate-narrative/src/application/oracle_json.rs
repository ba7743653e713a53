//! Pulling one JSON value out of free-form oracle text.
//!
//! The oracle is asked for bare JSON but routinely wraps it in a markdown
//! fence or surrounds it with chatter. Extraction strips a fence, then scans
//! for the first bracket-balanced `{...}` or `[...]` span that parses.

use frightfate_core::oracle::OracleError;
use serde::de::DeserializeOwned;

/// Removes a leading ```` ``` ```` / ```` ```json ```` fence and a trailing
/// ```` ``` ```` fence, if present.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Byte length of the balanced value starting at `text[0]`, which must be
/// `{` or `[`. String literals (with escapes) are skipped. `None` if the
/// brackets never balance or are mismatched.
fn balanced_len(text: &str) -> Option<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => stack.push(b'}'),
            b'[' => stack.push(b']'),
            b'}' | b']' => {
                if stack.pop() != Some(byte) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// The first balanced JSON object or array in `text` that is valid JSON.
#[must_use]
pub fn first_json_value(text: &str) -> Option<&str> {
    let body = strip_code_fence(text);
    body.char_indices()
        .filter(|(_, c)| matches!(c, '{' | '['))
        .find_map(|(start, _)| {
            let candidate = &body[start..];
            let span = &candidate[..balanced_len(candidate)?];
            serde_json::from_str::<serde_json::Value>(span)
                .is_ok()
                .then_some(span)
        })
}

/// Extracts and deserializes the first JSON value in `text`.
///
/// # Errors
///
/// `OracleError::MalformedOutput` if no JSON value is found or it does not
/// have the shape of `T`.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, OracleError> {
    let span = first_json_value(text)
        .ok_or_else(|| OracleError::MalformedOutput("no JSON value in response".to_owned()))?;
    serde_json::from_str(span).map_err(|e| OracleError::MalformedOutput(e.to_string()))
}
