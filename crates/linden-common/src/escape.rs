//! Entity escaping for text and attribute values.

/// Replace the five markup-significant characters with named entities.
///
/// Used for CDATA content before it is re-emitted as text.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for use inside a double-quoted attribute.
#[must_use]
pub fn escape_attribute(input: &str) -> String {
    input.replace('"', "&quot;")
}
