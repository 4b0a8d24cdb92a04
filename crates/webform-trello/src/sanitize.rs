//! Allow-list HTML filter for card descriptions.
//!
//! Submitted values end up in the card body, so the rendered description is
//! parsed as an HTML fragment and re-serialized keeping only a small set of
//! formatting tags. Other tags are removed but their text is kept, except for
//! raw-text elements like `<script>` whose content is dropped entirely.
//! Event handler and style attributes are removed, and URL attributes with a
//! scheme outside the allowed protocols are removed.

use scraper::{ElementRef, Html, Node};

/// Tags kept in the output.
pub const ALLOWED_TAGS: &[&str] = &[
    "a",
    "em",
    "strong",
    "cite",
    "blockquote",
    "code",
    "ul",
    "ol",
    "li",
    "dl",
    "dt",
    "dd",
];

/// Elements dropped together with their content.
const DROPPED_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "textarea", "title",
    "xmp", "noembed", "noframes",
];

/// URL schemes allowed in `href`/`src`-like attributes.
const ALLOWED_PROTOCOLS: &[&str] = &[
    "ftp", "http", "https", "irc", "mailto", "news", "nntp", "rtsp", "sftp", "ssh", "tel",
    "telnet", "webcal",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite", "action", "formaction", "xlink:href"];

/// Filter `input` down to the default allowed tags.
#[must_use]
pub fn filter_xss(input: &str) -> String {
    filter_xss_with(input, ALLOWED_TAGS)
}

/// Filter `input` keeping only `allowed_tags`.
#[must_use]
pub fn filter_xss_with(input: &str, allowed_tags: &[&str]) -> String {
    let fragment = Html::parse_fragment(input);
    let mut out = String::with_capacity(input.len());
    write_children(fragment.root_element(), allowed_tags, &mut out);
    out
}

fn write_children(parent: ElementRef<'_>, allowed_tags: &[&str], out: &mut String) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => escape_text(text, out),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    write_element(element, allowed_tags, out);
                }
            }
            // Comments, doctypes and processing instructions are dropped.
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, allowed_tags: &[&str], out: &mut String) {
    let name = element.value().name();

    if DROPPED_WITH_CONTENT.contains(&name) {
        return;
    }

    if !allowed_tags.contains(&name) {
        write_children(element, allowed_tags, out);
        return;
    }

    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        if is_allowed_attribute(attr, value) {
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            escape_attribute(value, out);
            out.push('"');
        }
    }
    out.push('>');

    write_children(element, allowed_tags, out);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn is_allowed_attribute(name: &str, value: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if name.starts_with("on") || name == "style" {
        return false;
    }
    if URL_ATTRIBUTES.contains(&name.as_str()) {
        return is_safe_url(value);
    }
    true
}

/// Relative URLs pass; absolute URLs need an allowed scheme.
fn is_safe_url(value: &str) -> bool {
    // Browsers ignore control characters and whitespace inside schemes.
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_ascii_control() && !c.is_whitespace())
        .collect();

    let Some(colon) = cleaned.find(':') else {
        return true;
    };
    let before = &cleaned[..colon];
    if before.contains(['/', '?', '#']) {
        return true;
    }
    ALLOWED_PROTOCOLS.contains(&before.to_ascii_lowercase().as_str())
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
