//! Escaping transforms used when embedding text into generated documents.

/// Characters rewritten to `\u00XX` escapes inside script literals, so that no
/// `</script>`, `<!--` or entity sequence can appear in the embedding context.
const MARKUP_SENSITIVE: [(char, &str); 3] = [('<', "\\u003c"), ('>', "\\u003e"), ('&', "\\u0026")];

/// Encodes `text` as a double-quoted string literal for a `<script>` element.
///
/// The result is simultaneously a valid JSON string and a valid Python string
/// literal: serde_json only emits `\"`, `\\`, `\b`, `\f`, `\n`, `\r`, `\t` and
/// `\uXXXX`, all of which Python reads identically. Markup-sensitive
/// characters are additionally written as `\u` escapes.
///
/// Encoding never fails and decoding the literal always yields `text` again,
/// see [`decode_script_string_literal`].
pub fn script_string_literal(text: &str) -> String {
    let json = serde_json::Value::String(text.to_owned()).to_string();
    if !json.contains(['<', '>', '&']) {
        return json;
    }
    let mut literal = String::with_capacity(json.len() + 16);
    for character in json.chars() {
        match MARKUP_SENSITIVE
            .iter()
            .find(|(sensitive, _)| *sensitive == character)
        {
            Some((_, escaped)) => literal.push_str(escaped),
            None => literal.push(character),
        }
    }
    literal
}

/// Inverse of [`script_string_literal`].
pub fn decode_script_string_literal(literal: &str) -> Result<String, serde_json::Error> {
    serde_json::from_str(literal)
}

/// Escapes `text` for use inside a double-quoted HTML attribute value.
pub fn html_attribute(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}
