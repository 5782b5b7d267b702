//! Field localization with a fixed fallback chain.

use serde_json::Value;

use crate::lang::Lang;
use crate::record::ContentRecord;

/// Shown when no variant of a field carries a value.
pub const MISSING_FIELD: &str = "N/A";

/// Resolve the display text of `field` for `lang`.
///
/// Candidates, first non-empty wins:
/// `field + suffix(lang)`, `field`, `field_en`, then [`MISSING_FIELD`].
/// A language-specific variant wins over the plain field.
pub fn resolve(record: &ContentRecord, field: &str, lang: &Lang) -> String {
    let localized = format!("{field}{}", lang.field_suffix());
    let english = format!("{field}_en");

    let found = [localized.as_str(), field, english.as_str()]
        .into_iter()
        .find_map(|name| record.field(name).and_then(display_text));
    found.unwrap_or_else(|| MISSING_FIELD.to_string())
}

/// Text of a field value, `None` when it would display as nothing.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
