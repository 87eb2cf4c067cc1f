//! Literal quoting and full-text match escaping.

use serde_json::Value;

/// Characters with special meaning in the extended match syntax.
const MATCH_SPECIAL: &[char] = &[
    '\\', '(', ')', '|', '-', '!', '@', '~', '"', '&', '/', '^', '$', '=', '<',
];

/// Quotes a string literal following the MySQL escaping rules the daemon accepts.
pub fn quote_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Escapes every match-operator character so the text is matched literally.
pub fn escape_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MATCH_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Renders a JSON value as a SphinxQL literal.
///
/// Arrays become multi-value attribute tuples, objects are stored as JSON text.
pub fn quote_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_str(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(quote_value).collect();
            format!("({})", inner.join(", "))
        }
        Value::Object(_) => quote_str(&value.to_string()),
    }
}

/// Validates an index or column name before it is spliced into a statement.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '*' || c == '.')
}
