//! Plain-text rendering of JSON chat components.
//!
//! Chat packets carry a JSON component tree rather than text:
//!
//! ```json
//! {"translate":"chat.type.text","with":[{"text":"Steve"},"hello"]}
//! ```
//!
//! [`render_plain`] flattens such a tree into `<Steve> hello`. Styling is
//! dropped, as are legacy `§` formatting codes.

use serde_json::Value;

use crate::error::{ParserError, Result};

/// Translation keys the renderer knows, with their English patterns.
const TRANSLATIONS: &[(&str, &str)] = &[
    ("chat.type.text", "<%s> %s"),
    ("chat.type.announcement", "[%s] %s"),
    ("chat.type.emote", "* %s %s"),
    ("chat.type.admin", "[%s: %s]"),
    ("multiplayer.player.joined", "%s joined the game"),
    ("multiplayer.player.left", "%s left the game"),
];

/// Legacy formatting code prefix.
const SECTION_SIGN: char = '\u{00A7}';

/// Renders a JSON chat component as plain text.
///
/// # Errors
///
/// Returns `ParserError::InvalidChatComponent` if `json` is not valid JSON.
///
/// # Example
///
/// ```
/// use mcpr_chat::chat::render_plain;
///
/// let json = r#"{"translate":"chat.type.text","with":[{"text":"Steve"},"hello"]}"#;
/// assert_eq!(render_plain(json).unwrap(), "<Steve> hello");
/// ```
pub fn render_plain(json: &str) -> Result<String> {
    let value: Value =
        serde_json::from_str(json).map_err(|source| ParserError::InvalidChatComponent { source })?;

    let mut out = String::new();
    render(&value, &mut out);
    Ok(strip_formatting(&out))
}

fn render(value: &Value, out: &mut String) {
    match value {
        Value::String(text) => out.push_str(text),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => {}
        Value::Array(parts) => parts.iter().for_each(|part| render(part, out)),
        Value::Object(component) => {
            if let Some(text) = component.get("text") {
                render(text, out);
            }
            if let Some(Value::String(key)) = component.get("translate") {
                let args: Vec<String> = component
                    .get("with")
                    .and_then(Value::as_array)
                    .map(|with| with.iter().map(render_to_string).collect())
                    .unwrap_or_default();
                out.push_str(&translate(key, &args));
            }
            if let Some(Value::Array(extra)) = component.get("extra") {
                extra.iter().for_each(|part| render(part, out));
            }
        }
    }
}

fn render_to_string(value: &Value) -> String {
    let mut out = String::new();
    render(value, &mut out);
    out
}

fn translate(key: &str, args: &[String]) -> String {
    match TRANSLATIONS.iter().find(|(known, _)| *known == key) {
        Some((_, pattern)) => fill_pattern(pattern, args),
        None if args.is_empty() => key.to_string(),
        None => format!("{key} {}", args.join(" ")),
    }
}

/// Substitutes `%s` placeholders in order; missing arguments become empty.
fn fill_pattern(pattern: &str, args: &[String]) -> String {
    let mut out = String::new();
    let mut args = args.iter();
    let mut rest = pattern;

    while let Some(idx) = rest.find("%s") {
        out.push_str(&rest[..idx]);
        if let Some(arg) = args.next() {
            out.push_str(arg);
        }
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out
}

fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == SECTION_SIGN {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}
