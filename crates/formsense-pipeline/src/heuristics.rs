//! DOM-heuristic field extraction.
//!
//! Deterministic fallback for when the completion service yields nothing
//! usable. Finds input-capable elements and resolves a label and a unique
//! selector for each from the surrounding markup.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use formsense_protocols::field::FieldDescriptor;

static INPUT_CAPABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("input, select, textarea").expect("static selector"));
static LABEL: Lazy<Selector> = Lazy::new(|| Selector::parse("label").expect("static selector"));

/// Extract field descriptors directly from the DOM.
///
/// Containers are matched with `container_selector`; when the selector is
/// invalid or matches nothing the whole document is scanned for
/// input-capable elements instead. Never fails; an empty result means the
/// caller decides what to do next.
pub fn extract_from_dom(html: &str, container_selector: &str) -> Vec<FieldDescriptor> {
    let document = Html::parse_document(html);

    let containers: Vec<ElementRef> = match Selector::parse(container_selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => {
            warn!("invalid container selector: {}", container_selector);
            Vec::new()
        }
    };

    let mut fields = Vec::new();

    if containers.is_empty() {
        debug!(
            "no elements matched '{}', scanning whole document",
            container_selector
        );
        for input in document.select(&INPUT_CAPABLE) {
            let label = document_label(&document, input);
            let selector = resolve_selector(input, None);
            if !selector.is_empty() {
                fields.push(FieldDescriptor::new(selector, label));
            }
        }
        return fields;
    }

    for container in containers {
        for input in container.select(&INPUT_CAPABLE) {
            let label = container_label(container, input);
            let selector = resolve_selector(input, Some(container_selector));
            if !selector.is_empty() {
                fields.push(FieldDescriptor::new(selector, label));
            }
        }
    }
    fields
}

/// Visible text of an element: trimmed descendant text nodes joined by
/// single spaces.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first non-empty `<label for=id>` among `labels`.
fn label_for_id<'a>(labels: impl Iterator<Item = ElementRef<'a>>, id: &str) -> Option<String> {
    for label in labels {
        if label.value().attr("for") == Some(id) {
            let text = element_text(label);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn attr_label(input: ElementRef) -> String {
    for attr in ["placeholder", "name", "aria-label"] {
        if let Some(value) = input.value().attr(attr) {
            if !value.trim().is_empty() {
                return value.trim().to_string();
            }
        }
    }
    String::new()
}

/// Label resolution for the whole-document scan: associated label first,
/// then the input's own descriptive attributes.
fn document_label(document: &Html, input: ElementRef) -> String {
    if let Some(id) = input.value().id() {
        if let Some(text) = label_for_id(document.select(&LABEL), id) {
            return text;
        }
    }
    attr_label(input)
}

/// Label resolution inside a matched container, in priority order:
/// associated label, any label in the container, the container's text
/// minus its inputs' text, then the input's attributes.
fn container_label(container: ElementRef, input: ElementRef) -> String {
    if let Some(id) = input.value().id() {
        if let Some(text) = label_for_id(container.select(&LABEL), id) {
            return text;
        }
    }

    if let Some(label) = container.select(&LABEL).next() {
        let text = element_text(label);
        if !text.is_empty() {
            return text;
        }
    }

    let mut text = element_text(container);
    for nested in container.select(&INPUT_CAPABLE) {
        let nested_text = element_text(nested);
        if !nested_text.is_empty() {
            text = text.replace(&nested_text, "");
        }
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        return text;
    }

    attr_label(input)
}

/// Whether a value is safe to embed in a `#id` selector.
fn is_css_identifier(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with(|c: char| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Selector resolution, in priority order: `#id`, `tag[name='...']`, a
/// path of up to three ancestor class lists (most distant first) plus the
/// tag, then the bare tag. Inside a matched container the class path is
/// replaced by `{container_selector} {tag}`.
fn resolve_selector(input: ElementRef, container_selector: Option<&str>) -> String {
    let tag = input.value().name();

    if let Some(id) = input.value().id() {
        if is_css_identifier(id) {
            return format!("#{}", id);
        }
    }

    if let Some(name) = input.value().attr("name") {
        if !name.is_empty() && !name.contains('\'') {
            return format!("{}[name='{}']", tag, name);
        }
    }

    if let Some(prefix) = container_selector {
        return format!("{} {}", prefix, tag);
    }

    let mut ancestor_classes: Vec<String> = input
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(3)
        .filter_map(|ancestor| {
            let classes: Vec<&str> = ancestor.value().classes().collect();
            if classes.is_empty() {
                None
            } else {
                Some(format!(".{}", classes.join(".")))
            }
        })
        .collect();

    if ancestor_classes.is_empty() {
        tag.to_string()
    } else {
        ancestor_classes.reverse();
        format!("{} {}", ancestor_classes.join(" "), tag)
    }
}

#[cfg(test)]
#[path = "heuristics_tests.rs"]
mod tests;
