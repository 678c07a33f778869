// src/utils/html.rs
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

static HTML_MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:html|body|div|p|table|font|span)[\s>]")
        .expect("Failed to compile HTML_MARKUP_RE")
});

static EXCESS_BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{3,}").expect("Failed to compile EXCESS_BLANK_LINES_RE")
});

// Elements that start a new paragraph (blank line) vs. a new line.
const PARAGRAPH_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "table"];
const LINE_TAGS: &[&str] = &["br", "div", "tr", "li", "hr"];
const SKIPPED_TAGS: &[&str] = &["script", "style", "head"];

/// Quick check for HTML markup in a filing body.
pub fn looks_like_html(content: &str) -> bool {
    HTML_MARKUP_RE.is_match(content)
}

/// Flattens an HTML document into plain text.
///
/// Paragraph-level elements are separated by a blank line, other block elements
/// by a single line break. Non-breaking spaces become plain spaces so keyword
/// and heading patterns match as they would on a `.txt` rendition.
pub fn to_plain_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len() / 2);

    for node in document.root_element().descendants() {
        match node.value() {
            Node::Element(element) => {
                let name = element.name();
                if PARAGRAPH_TAGS.contains(&name) {
                    text.push_str("\n\n");
                } else if LINE_TAGS.contains(&name) {
                    text.push('\n');
                } else if name == "td" || name == "th" {
                    text.push(' ');
                }
            }
            Node::Text(chunk) => {
                let inside_skipped = node
                    .ancestors()
                    .filter_map(|a| a.value().as_element())
                    .any(|e| SKIPPED_TAGS.contains(&e.name()));
                if !inside_skipped {
                    text.push_str(&chunk.text);
                }
            }
            _ => {}
        }
    }

    let text = text.replace('\u{a0}', " ");
    let text = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    EXCESS_BLANK_LINES_RE
        .replace_all(text.trim(), "\n\n")
        .into_owned()
}
