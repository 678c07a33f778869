// src/parsers/form10q.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{FilingMetadata, FormType, ParsedData, ParsedFiling, QuarterlyReportData};
use super::section::{extract_section, has_keywords};
use super::FilingParser;
use crate::utils::error::ParseError;

const BUYBACK_SECTION_MARKER: &str = "Issuer Purchases of Equity Securities";
const PATENT_SECTION_MARKERS: &[&str] = &["Patents", "Intellectual Property"];
const SECTION_END_MARKER: &str = "Item";

const NEW_PATENT_KEYWORDS: &[&str] = &[
    "new patent", "patent issuance", "patent approval",
    "patent office has granted", "patent has been issued",
];

static TOTAL_SHARES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)total\s+of\s+([\d,]+)\s+shares").expect("Failed to compile TOTAL_SHARES_RE")
});

static DOLLAR_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$([\d,]+(?:\.\d+)?)\s+(million|billion)")
        .expect("Failed to compile DOLLAR_AMOUNT_RE")
});

/// Parser for Form 10-Q quarterly reports, focused on buyback and patent disclosures.
#[derive(Debug, Default, Clone, Copy)]
pub struct Form10QParser;

impl Form10QParser {
    fn parse_buyback_section(&self, section: &str, data: &mut QuarterlyReportData) {
        data.buyback = true;
        data.buyback_details = Some(section.to_string());

        data.total_shares_repurchased = TOTAL_SHARES_RE
            .captures(section)
            .and_then(|caps| caps[1].replace(',', "").parse::<u64>().ok());

        data.buyback_amount = DOLLAR_AMOUNT_RE.captures(section).and_then(|caps| {
            let amount = caps[1].replace(',', "").parse::<f64>().ok()?;
            let multiplier = if caps[2].eq_ignore_ascii_case("billion") { 1e9 } else { 1e6 };
            Some(amount * multiplier)
        });
    }
}

impl FilingParser for Form10QParser {
    fn form_types(&self) -> &'static [FormType] {
        &[FormType::TenQ]
    }

    fn parse(&self, content: &str, metadata: &FilingMetadata) -> Result<ParsedFiling, ParseError> {
        tracing::info!("Parsing 10-Q filing: {}", metadata.accession_number);
        self.check_metadata(metadata)?;

        let mut data = QuarterlyReportData::default();

        // A marker followed straight by the next item (table of contents) is
        // not a section.
        if let Some(section) = non_empty_section(content, BUYBACK_SECTION_MARKER) {
            self.parse_buyback_section(section, &mut data);
        }

        let patent_section = PATENT_SECTION_MARKERS
            .iter()
            .find_map(|marker| non_empty_section(content, marker));

        if let Some(section) = patent_section {
            data.new_patents = has_keywords(section, NEW_PATENT_KEYWORDS);
            data.patent_info = Some(section.to_string());
        }

        Ok(ParsedFiling::new(content, metadata, ParsedData::QuarterlyReport(data)))
    }
}

fn non_empty_section<'a>(content: &'a str, marker: &str) -> Option<&'a str> {
    extract_section(content, marker, SECTION_END_MARKER).filter(|section| !section.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::metadata;

    fn parse(content: &str) -> QuarterlyReportData {
        let filing = Form10QParser.parse(content, &metadata("10-Q")).unwrap();
        match filing.parsed_data {
            ParsedData::QuarterlyReport(data) => data,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn buyback_section_with_shares_and_amount() {
        let data = parse(
            "PART II\nIssuer Purchases of Equity Securities\nDuring the quarter we repurchased a total of \
             1,250,000 shares for $1.5 billion under the program.\nItem 3. Defaults Upon Senior Securities",
        );
        assert!(data.buyback);
        assert_eq!(data.total_shares_repurchased, Some(1_250_000));
        assert_eq!(data.buyback_amount, Some(1.5e9));
        assert!(data.buyback_details.unwrap().starts_with("During the quarter"));
    }

    #[test]
    fn million_amount_is_scaled_once() {
        let data = parse("Issuer Purchases of Equity Securities\nwe spent $250 million\nItem 5.");
        assert_eq!(data.buyback_amount, Some(250_000_000.0));
        assert_eq!(data.total_shares_repurchased, None);
    }

    #[test]
    fn patent_section_falls_back_to_intellectual_property() {
        let data = parse(
            "Intellectual Property\nThe patent office has granted our application.\nItem 1A. Risk Factors",
        );
        assert!(data.new_patents);
        assert!(!data.buyback);
        assert_eq!(
            data.patent_info.as_deref(),
            Some("The patent office has granted our application.")
        );
    }

    #[test]
    fn table_of_contents_entries_are_not_sections() {
        let data = parse(
            "TABLE OF CONTENTS\nIssuer Purchases of Equity Securities\nItem 3. Defaults\n\
             Patents\nItem 4. Mine Safety Disclosures\n\
             Intellectual Property\nThe patent office has granted our application.\nItem 5. Other",
        );
        assert!(!data.buyback);
        assert_eq!(data.buyback_details, None);
        assert!(data.new_patents);
        assert_eq!(
            data.patent_info.as_deref(),
            Some("The patent office has granted our application.")
        );
    }

    #[test]
    fn nothing_found() {
        assert_eq!(parse("Quarterly report without the sections."), QuarterlyReportData::default());
    }
}
