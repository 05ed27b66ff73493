//! JSON text in the byte layout the endpoint uses on both of its wires.

use serde_json::Value;

/// Encode a single-key object as `{"key": value}` with `": "` after the key
/// and the string value escaped by [`ascii_json_string`].
pub fn single_field_object(key: &str, value: &str) -> String {
    format!(
        "{{{}: {}}}",
        ascii_json_string(key),
        ascii_json_string(value)
    )
}

/// Encode a string as a JSON string literal containing only printable ASCII.
///
/// Quotes, backslashes and control characters use serde_json's escapes;
/// every other character outside `' '..='~'` becomes lowercase `\uXXXX`,
/// as a UTF-16 surrogate pair above the BMP.
pub fn ascii_json_string(value: &str) -> String {
    // A `String` value always serializes.
    let escaped = serde_json::to_string(&Value::from(value)).unwrap_or_else(|_| "\"\"".into());

    let mut out = String::with_capacity(escaped.len());
    for ch in escaped.chars() {
        if (' '..='~').contains(&ch) {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
