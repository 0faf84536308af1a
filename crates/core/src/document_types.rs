//! Document type tags.

/// Tags offered even before any document of that type exists.
pub const COMMON_DOCUMENT_TYPES: &[&str] =
    &["handbook", "training", "checklist", "policy", "form", "template"];

/// Tag applied when an upload names none.
pub const DEFAULT_DOCUMENT_TYPE: &str = "general";

/// Normalize a caller-supplied tag: trimmed, blank becomes the default.
pub fn normalize_document_type(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_DOCUMENT_TYPE.to_string(),
    }
}

/// Sorted, de-duplicated union of stored tags and [`COMMON_DOCUMENT_TYPES`].
pub fn merge_document_types(stored: Vec<String>) -> Vec<String> {
    let mut types = stored;
    types.extend(COMMON_DOCUMENT_TYPES.iter().map(|t| t.to_string()));
    types.sort();
    types.dedup();
    types
}
