// src/parsers/section.rs
//
// Text primitives shared by every form parser. Tag helpers scan with `find`
// and slice; they never use multi-line regexes.

/// Returns the trimmed text between the first `start_marker` and the first
/// `end_marker` after it. Literal, case-sensitive search.
pub fn extract_section<'a>(content: &'a str, start_marker: &str, end_marker: &str) -> Option<&'a str> {
    let start = content.find(start_marker)? + start_marker.len();
    let end = content[start..].find(end_marker)? + start;
    Some(content[start..end].trim())
}

/// Case-insensitive check for any of `keywords` in `content`.
pub fn has_keywords(content: &str, keywords: &[&str]) -> bool {
    let normalized = content.to_lowercase();
    keywords
        .iter()
        .any(|keyword| normalized.contains(&keyword.to_lowercase()))
}

/// Inner text of the first `<tag>...</tag>` pair, untrimmed.
pub fn tag_inner<'a>(content: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    extract_between(content, &open, &close)
}

/// Trimmed text of the first `<tag>` element. When the element wraps a
/// `<value>` child (EDGAR ownership XML), the child's text is returned instead.
pub fn tag_text<'a>(content: &'a str, tag: &str) -> Option<&'a str> {
    let inner = tag_inner(content, tag)?;
    let text = tag_inner(inner, "value").unwrap_or(inner).trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Every `<tag>...</tag>` block in document order, tags included.
pub fn tag_blocks<'a>(content: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(rel_start) = content[pos..].find(&open) {
        let start = pos + rel_start;
        let Some(rel_end) = content[start..].find(&close) else {
            break;
        };
        let end = start + rel_end + close.len();
        blocks.push(&content[start..end]);
        pos = end;
    }

    blocks
}

/// Parses a numeric tag value, tolerating thousands separators and a trailing
/// percent sign. Missing or unparseable values read as zero.
pub fn parse_number(raw: Option<&str>) -> f64 {
    raw.map(|s| s.replace(',', ""))
        .and_then(|s| s.trim().trim_end_matches('%').trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Interprets XML boolean flags (`1`/`true`).
pub fn is_flag_set(raw: Option<&str>) -> bool {
    matches!(raw, Some(v) if v == "1" || v.eq_ignore_ascii_case("true"))
}

fn extract_between<'a>(content: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = content.find(open)? + open.len();
    let end = content[start..].find(close)? + start;
    Some(&content[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_between_markers() {
        let content = "Header\nIssuer Purchases of Equity Securities\n  a total of 100 shares \nItem 3. Defaults";
        assert_eq!(
            extract_section(content, "Issuer Purchases of Equity Securities", "Item"),
            Some("a total of 100 shares")
        );
    }

    #[test]
    fn section_requires_both_markers() {
        assert_eq!(extract_section("no markers here", "Patents", "Item"), None);
        assert_eq!(extract_section("Patents but no end", "Patents", "Item"), None);
        // Case-sensitive.
        assert_eq!(extract_section("patents ... Item 1", "Patents", "Item"), None);
    }

    #[test]
    fn end_marker_is_searched_after_start() {
        let content = "Item 1. Patents granted this quarter Item 2.";
        assert_eq!(
            extract_section(content, "Patents", "Item"),
            Some("granted this quarter")
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert!(has_keywords("COMPANY changed its Name", &["changed its name"]));
        assert!(has_keywords("a Stock Buyback", &["STOCK BUYBACK"]));
        assert!(!has_keywords("unrelated text", &["buyback"]));
        assert!(!has_keywords("anything", &[]));
    }

    #[test]
    fn tag_text_reads_inline_and_nested_values() {
        let inline = "<transactionShares>1,500</transactionShares>";
        let nested = "<transactionShares>\n  <value>250</value>\n</transactionShares>";
        assert_eq!(tag_text(inline, "transactionShares"), Some("1,500"));
        assert_eq!(tag_text(nested, "transactionShares"), Some("250"));
        assert_eq!(tag_text("<cusip>  </cusip>", "cusip"), None);
        assert_eq!(tag_text("<cusip>123", "cusip"), None);
    }

    #[test]
    fn blocks_are_collected_in_order() {
        let content = "<t>one</t> noise <t>two</t> <t>unterminated";
        assert_eq!(tag_blocks(content, "t"), vec!["<t>one</t>", "<t>two</t>"]);
        assert!(tag_blocks("nothing", "t").is_empty());
    }

    #[test]
    fn numbers_and_flags() {
        assert_eq!(parse_number(Some("1,000")), 1000.0);
        assert_eq!(parse_number(Some(" 6.2% ")), 6.2);
        assert_eq!(parse_number(Some("n/a")), 0.0);
        assert_eq!(parse_number(None), 0.0);
        assert!(is_flag_set(Some("1")));
        assert!(is_flag_set(Some("true")));
        assert!(!is_flag_set(Some("0")));
        assert!(!is_flag_set(None));
    }
}
