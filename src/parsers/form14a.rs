// src/parsers/form14a.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{FilingMetadata, FormType, ParsedData, ParsedFiling, ProxyData};
use super::section::has_keywords;
use super::FilingParser;
use crate::utils::error::ParseError;

const NAME_CHANGE_KEYWORDS: &[&str] = &[
    "change the name", "amendment to the company name",
    "changing the company name", "corporate name change",
];
const REVERSE_SPLIT_KEYWORDS: &[&str] = &["reverse stock split", "reverse split", "share consolidation"];
const SPECIAL_DIVIDEND_KEYWORDS: &[&str] = &[
    "special dividend", "special distribution", "one-time dividend",
    "extraordinary dividend",
];

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").expect("Failed to compile PARAGRAPH_BREAK_RE")
});

static RATIO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)[:-](\d+)").expect("Failed to compile RATIO_RE")
});

/// Parser for proxy statements (DEF 14A / PRE 14A).
#[derive(Debug, Default, Clone, Copy)]
pub struct Form14AParser;

impl Form14AParser {
    /// First blank-line delimited paragraph mentioning any of `keywords`.
    fn find_paragraph<'a>(&self, paragraphs: &[&'a str], keywords: &[&str]) -> Option<&'a str> {
        paragraphs.iter().copied().find(|p| has_keywords(p, keywords))
    }
}

impl FilingParser for Form14AParser {
    fn form_types(&self) -> &'static [FormType] {
        &[FormType::Def14A, FormType::Pre14A]
    }

    fn parse(&self, content: &str, metadata: &FilingMetadata) -> Result<ParsedFiling, ParseError> {
        tracing::info!("Parsing {} filing: {}", metadata.form_type, metadata.accession_number);
        self.check_metadata(metadata)?;

        let paragraphs: Vec<&str> = PARAGRAPH_BREAK_RE.split(content).collect();

        let reverse_split = self.find_paragraph(&paragraphs, REVERSE_SPLIT_KEYWORDS);
        let data = ProxyData {
            name_change_details: self
                .find_paragraph(&paragraphs, NAME_CHANGE_KEYWORDS)
                .map(str::to_string),
            split_ratio: reverse_split
                .and_then(|p| RATIO_RE.captures(p))
                .map(|caps| format!("{}:{}", &caps[1], &caps[2])),
            reverse_split_details: reverse_split.map(str::to_string),
            special_dividend_details: self
                .find_paragraph(&paragraphs, SPECIAL_DIVIDEND_KEYWORDS)
                .map(str::to_string),
        };

        Ok(ParsedFiling::new(content, metadata, ParsedData::ProxyStatement(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::metadata;

    fn parse(content: &str) -> ProxyData {
        let filing = Form14AParser.parse(content, &metadata("DEF 14A")).unwrap();
        match filing.parsed_data {
            ParsedData::ProxyStatement(data) => data,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn proposals_are_matched_per_paragraph() {
        let content = "NOTICE OF ANNUAL MEETING\n\n\
                       Proposal 2: To approve a reverse stock split of our common stock at a ratio of 1-10.\n\
                       The board recommends a vote FOR.\n   \n\
                       Proposal 3: To amend the charter to change the name of the Company.";
        let data = parse(content);

        assert_eq!(data.split_ratio.as_deref(), Some("1:10"));
        assert!(data.reverse_split_details.unwrap().starts_with("Proposal 2"));
        assert_eq!(
            data.name_change_details.as_deref(),
            Some("Proposal 3: To amend the charter to change the name of the Company.")
        );
        assert!(data.special_dividend_details.is_none());
    }

    #[test]
    fn split_without_ratio() {
        let data = parse("Approve a share consolidation at the board's discretion.");
        assert!(data.reverse_split_details.is_some());
        assert!(data.split_ratio.is_none());
    }

    #[test]
    fn claims_both_proxy_forms() {
        assert!(Form14AParser.can_parse("DEF 14A"));
        assert!(Form14AParser.can_parse("PRE 14A"));
        assert!(!Form14AParser.can_parse("DEF 14C"));
        let filing = Form14AParser
            .parse("A one-time dividend is proposed.", &metadata("PRE 14A"))
            .unwrap();
        assert!(filing.parsed_data.signals().special_dividend);
    }
}
