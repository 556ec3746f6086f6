use super::*;

#[test]
fn test_removes_scripts_styles_comments() {
    let html = r#"<div><script>alert(1)</script><style>.a{color:red}</style><!-- note --><p>keep</p></div>"#;
    let cleaned = sanitize(html);
    assert!(!cleaned.contains("<script"));
    assert!(!cleaned.contains("alert"));
    assert!(!cleaned.contains("<style"));
    assert!(!cleaned.contains("color:red"));
    assert!(!cleaned.contains("<!--"));
    assert!(cleaned.contains("<p>keep</p>"));
}

#[test]
fn test_removes_event_handlers_and_inline_style() {
    let html = r#"<div class="row" style="color:red" onclick="steal()" onmouseover="x()">hi</div>"#;
    let cleaned = sanitize(html);
    assert!(!cleaned.contains("onclick"));
    assert!(!cleaned.contains("onmouseover"));
    assert!(!cleaned.contains("style="));
    assert!(cleaned.contains(r#"<div class="row">"#));
}

#[test]
fn test_input_attribute_allow_list() {
    let html = r#"<input type="email" name="mail" id="m" placeholder="you@x" value="v" required class="c" aria-label="Mail" tabindex="3" autocomplete="off">"#;
    let cleaned = sanitize(html);
    assert!(cleaned.contains(r#"type="email""#));
    assert!(cleaned.contains(r#"name="mail""#));
    assert!(cleaned.contains(r#"placeholder="you@x""#));
    assert!(cleaned.contains(r#"aria-label="Mail""#));
    assert!(!cleaned.contains("tabindex"));
    assert!(!cleaned.contains("autocomplete"));
}

#[test]
fn test_structural_tags_keep_only_class_and_id() {
    let html = r#"<section id="s" class="c" role="main" aria-hidden="true"><span data-tracking="x">t</span></section>"#;
    let cleaned = sanitize(html);
    assert!(cleaned.contains(r#"<section id="s" class="c">"#));
    assert!(!cleaned.contains("role="));
    assert!(!cleaned.contains("aria-hidden"));
    assert!(!cleaned.contains("data-tracking"));
}

#[test]
fn test_allowed_data_attributes_survive() {
    let html = r#"<div data-field="name" data-junk="y">x</div>"#;
    let cleaned = sanitize(html);
    assert!(cleaned.contains(r#"data-field="name""#));
    assert!(!cleaned.contains("data-junk"));
}

#[test]
fn test_label_keeps_for_attribute() {
    let html = r#"<label for="email" class="q" title="t">Your email</label><input id="email">"#;
    let cleaned = sanitize(html);
    assert!(cleaned.contains(r#"<label for="email" class="q">"#));
    assert!(!cleaned.contains("title="));
}

#[test]
fn test_strip_head_option() {
    let html = r#"<html><head><title>T</title><meta charset="utf-8"></head><body><p>b</p></body></html>"#;
    let options = SanitizeOptions { strip_head: true };
    let cleaned = sanitize_with(html, &options);
    assert!(!cleaned.contains("<head"));
    assert!(!cleaned.contains("<title"));
    assert!(cleaned.contains("<p>b</p>"));
}

#[test]
fn test_idempotent() {
    let html = r#"<html><head><title>T</title></head><body><form id="f"><div class="row" onclick="x()"><label for="a">A</label><input id="a" placeholder="p" tabindex="2"></div></form></body></html>"#;
    let once = sanitize(html);
    let twice = sanitize(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_idempotent_with_strip_head() {
    let options = SanitizeOptions { strip_head: true };
    let html = r#"<html><head><title>T</title></head><body><input id="a"></body></html>"#;
    let once = sanitize_with(html, &options);
    let twice = sanitize_with(&once, &options);
    assert_eq!(once, twice);
}

#[test]
fn test_malformed_input_does_not_panic() {
    for html in [
        "<div><p>unclosed",
        "<<<>>>",
        "<input value=\"unterminated",
        "</only-closing>",
        "plain text & ampersand < angle",
        "",
    ] {
        let cleaned = sanitize(html);
        assert!(!cleaned.contains("<script"));
    }
}

#[test]
fn test_text_entities_round_trip() {
    let html = "<p>a &amp; b &lt; c</p>";
    let once = sanitize(html);
    assert!(once.contains("a &amp; b &lt; c"));
    assert_eq!(once, sanitize(&once));
}
