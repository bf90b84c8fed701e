use super::types::RawBookData;
use super::ExtractionError;

/// Parse the extraction response into the raw book-data wire shape.
///
/// JSON-response mode should give bare JSON, but models occasionally wrap
/// the object in markdown fences; those are stripped before parsing.
/// Anything that still fails to deserialize is a schema violation and is
/// permanently fatal: there is no point re-asking with the same prompt.
pub fn parse_book_response(response: &str) -> Result<RawBookData, ExtractionError> {
    let json = strip_code_fences(response);
    if json.is_empty() {
        return Err(ExtractionError::MalformedResponse(
            "empty extraction response".into(),
        ));
    }

    serde_json::from_str(json).map_err(|e| ExtractionError::SchemaViolation(e.to_string()))
}

/// Strip an optional ```json … ``` (or bare ```) fence around the payload.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
