//! HTML escaping

/// Characters that change meaning inside markup
const SPECIAL_CHARS: &[char] = &['&', '\'', '<', '>', '"'];

/// Whether `s` contains a character that would need escaping
pub fn needs_escaping(s: &str) -> bool {
    s.contains(SPECIAL_CHARS)
}

/// Escape text content for HTML
pub fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
pub fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}
