//! Embedded-JSON form extraction.
//!
//! Some platforms serialize their form model into inline script data
//! instead of exposing standard form controls. This module locates that
//! payload in the *raw* page HTML (sanitization would strip the script it
//! lives in), extracts the object literal with a balanced-delimiter scan,
//! and synthesizes field descriptors from it. Selector inference and the
//! generic extractor are bypassed entirely on this path.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use formsense_protocols::field::FieldDescriptor;

/// Start of the form object: an (optionally quoted) `form` key followed
/// by a colon and an opening brace.
static FORM_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']?\bform["']?\s*:\s*\{"#).expect("static regex"));

/// Sibling key that follows the form object in the payload; used to
/// bound the scan when the object literal is truncated.
static MESSAGES_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#",\s*["']?messages["']?\s*:"#).expect("static regex"));

/// Result of locating and parsing the embedded form object.
#[derive(Debug, Clone)]
pub enum EmbeddedParse {
    Parsed(serde_json::Value),
    NotFound,
    Malformed,
}

/// Extract the object literal starting at `start` (an opening brace) by
/// tracking delimiter depth, skipping string contents.
fn balanced_object(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Close an object fragment cut off at a terminator: drop a trailing
/// comma and append the closers still open at the cut point.
fn close_unbalanced(fragment: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in fragment.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut out = fragment.trim_end().trim_end_matches(',').to_string();
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}

/// Rewrite a script-embedded object literal into strict JSON: quote bare
/// object keys, convert single-quoted strings, and drop trailing commas
/// before a closing delimiter.
fn normalize_loose_json(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    // true = object context, false = array context
    let mut stack: Vec<bool> = Vec::new();
    let mut expect_key = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let quote = c;
                out.push('"');
                i += 1;
                while i < chars.len() {
                    let s = chars[i];
                    if s == '\\' && i + 1 < chars.len() {
                        let next = chars[i + 1];
                        if quote == '\'' && next == '\'' {
                            // \' is not a JSON escape
                            out.push('\'');
                        } else {
                            out.push(s);
                            out.push(next);
                        }
                        i += 2;
                        continue;
                    }
                    if s == quote {
                        break;
                    }
                    if s == '"' {
                        out.push('\\');
                    }
                    out.push(s);
                    i += 1;
                }
                out.push('"');
                i += 1;
            }
            '{' => {
                stack.push(true);
                expect_key = true;
                out.push(c);
                i += 1;
            }
            '[' => {
                stack.push(false);
                expect_key = false;
                out.push(c);
                i += 1;
            }
            '}' | ']' => {
                stack.pop();
                expect_key = false;
                out.push(c);
                i += 1;
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    // trailing comma, drop it
                    i += 1;
                } else {
                    expect_key = stack.last().copied().unwrap_or(false);
                    out.push(c);
                    i += 1;
                }
            }
            ':' => {
                expect_key = false;
                out.push(c);
                i += 1;
            }
            c if expect_key && (c.is_ascii_alphanumeric() || c == '_' || c == '$') => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                out.push('"');
                out.extend(chars[start..i].iter());
                out.push('"');
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Locate and parse the embedded form object in raw page HTML.
pub fn parse_embedded_form(html: &str) -> EmbeddedParse {
    let Some(marker) = FORM_KEY.find(html) else {
        return EmbeddedParse::NotFound;
    };
    let start = marker.end() - 1;

    let literal = match balanced_object(html, start) {
        Some(literal) => literal.to_string(),
        None => match MESSAGES_KEY.find_at(html, start) {
            Some(terminator) => close_unbalanced(&html[start..terminator.start()]),
            None => return EmbeddedParse::Malformed,
        },
    };

    match serde_json::from_str(&normalize_loose_json(&literal)) {
        Ok(value) => EmbeddedParse::Parsed(value),
        Err(e) => {
            warn!("embedded form payload did not parse: {}", e);
            EmbeddedParse::Malformed
        }
    }
}

/// Synthesize descriptors from the embedded form object.
///
/// Each entry of `fields` carrying a `type`, a stable `ref` and a
/// non-empty `title` becomes one descriptor whose selector targets
/// elements labelled with the `type-ref` prefix. Zero descriptors means
/// the caller should fall back to the generic pipeline.
pub fn extract_embedded_fields(html: &str) -> Vec<FieldDescriptor> {
    let form = match parse_embedded_form(html) {
        EmbeddedParse::Parsed(value) => value,
        EmbeddedParse::NotFound => {
            debug!("no embedded form payload found");
            return Vec::new();
        }
        EmbeddedParse::Malformed => {
            warn!("embedded form payload unusable");
            return Vec::new();
        }
    };

    let Some(fields) = form.get("fields").and_then(|f| f.as_array()) else {
        warn!("embedded form object has no fields array");
        return Vec::new();
    };

    fields
        .iter()
        .filter_map(|field| {
            let field_type = field.get("type")?.as_str()?;
            let field_ref = field.get("ref")?.as_str()?;
            let title = field.get("title")?.as_str()?;
            if field_type.is_empty() || field_ref.is_empty() || title.is_empty() {
                return None;
            }
            let prefix = format!("{}-{}", field_type, field_ref);
            Some(FieldDescriptor::new(
                format!(
                    "[aria-labelledby^=\"{p}\"], [aria-describedby^=\"{p}\"]",
                    p = prefix
                ),
                title,
            ))
        })
        .collect()
}

#[cfg(test)]
#[path = "embedded_tests.rs"]
mod tests;
