//! HTML sanitizer.
//!
//! Reduces raw page HTML to the structural content the heuristics and the
//! completion service need: scripts, styles, comments and event-handler
//! attributes are removed, and each element keeps only a small per-tag
//! attribute allow-list. The output is re-emitted from the parse tree, so
//! sanitizing a second time is a no-op.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Sanitizer options.
#[derive(Debug, Clone, Default)]
pub struct SanitizeOptions {
    /// Drop the document `<head>` subtree entirely.
    pub strip_head: bool,
}

/// `data-*` attributes that survive sanitization on any tag.
const DATA_ALLOWED: [&str; 4] = ["data-id", "data-name", "data-field", "data-label"];

/// Tags that never take a closing tag.
const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn allowed_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "input" => &[
            "type",
            "name",
            "id",
            "placeholder",
            "value",
            "required",
            "class",
            "aria-label",
        ],
        "select" => &["name", "id", "multiple", "required", "class", "aria-label"],
        "textarea" => &["name", "id", "placeholder", "required", "class", "aria-label"],
        "label" => &["for", "class"],
        "form" => &["id", "name", "class", "action", "method"],
        "option" => &["value", "selected"],
        "button" => &["type", "class", "id"],
        // Structural and unknown tags keep only their identity.
        _ => &["class", "id"],
    }
}

fn keep_attr(tag: &str, name: &str) -> bool {
    if name.starts_with("on") || name == "style" {
        return false;
    }
    if name.starts_with("data-") {
        return DATA_ALLOWED.contains(&name);
    }
    allowed_attrs(tag).contains(&name)
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn write_node(node: NodeRef<'_, Node>, options: &SanitizeOptions, out: &mut String) {
    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(child, options, out);
            }
        }
        Node::Element(element) => {
            let tag = element.name();
            if tag == "script" || tag == "style" {
                return;
            }
            if tag == "head" && options.strip_head {
                return;
            }

            out.push('<');
            out.push_str(tag);
            for (name, value) in element.attrs() {
                if !keep_attr(tag, name) {
                    continue;
                }
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_TAGS.contains(&tag) {
                return;
            }
            for child in node.children() {
                write_node(child, options, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Node::Text(text) => escape_text(text, out),
        // Comments, doctypes and processing instructions carry no
        // structural information for form detection.
        Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_) => {}
    }
}

/// Sanitize with default options.
pub fn sanitize(html: &str) -> String {
    sanitize_with(html, &SanitizeOptions::default())
}

/// Sanitize raw HTML.
///
/// Never fails on malformed input: the parser is error-recovering, and if
/// reduction would lose the document entirely the original input is
/// returned unchanged.
pub fn sanitize_with(html: &str, options: &SanitizeOptions) -> String {
    let document = Html::parse_document(html);

    let mut out = String::with_capacity(html.len());
    write_node(document.tree.root(), options, &mut out);

    if out.trim().is_empty() && !html.trim().is_empty() {
        return html.to_string();
    }
    out
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
