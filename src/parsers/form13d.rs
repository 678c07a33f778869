// src/parsers/form13d.rs
use super::model::{FilingMetadata, FormType, OwnershipData, ParsedData, ParsedFiling};
use super::section::{has_keywords, parse_number, tag_inner, tag_text};
use super::FilingParser;
use crate::utils::error::ParseError;

const ACTIVIST_KEYWORDS: &[&str] = &[
    "change board", "management change", "strategic alternatives",
    "strategic review", "sell the company", "merger", "acquisition",
    "activist", "proxy contest", "board seat", "director nomination",
];

/// Parser for Schedule 13D beneficial ownership reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct Form13DParser;

impl FilingParser for Form13DParser {
    fn form_types(&self) -> &'static [FormType] {
        &[FormType::Schedule13D]
    }

    fn parse(&self, content: &str, metadata: &FilingMetadata) -> Result<ParsedFiling, ParseError> {
        tracing::info!("Parsing Schedule 13D filing: {}", metadata.accession_number);
        self.check_metadata(metadata)?;

        // The purpose block is free text spanning lines.
        let purpose = tag_inner(content, "purpose")
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let data = OwnershipData {
            reporting_person: tag_text(content, "reportingPersonName").map(str::to_string),
            cusip: tag_text(content, "cusip").map(str::to_string),
            issuer_name: tag_text(content, "issuerName").map(str::to_string),
            percent_owned: parse_number(tag_text(content, "percentOfClass")),
            is_activist: purpose.map_or(false, |p| has_keywords(p, ACTIVIST_KEYWORDS)),
            purpose: purpose.map(str::to_string),
        };

        Ok(ParsedFiling::new(content, metadata, ParsedData::BeneficialOwnership(data)))
    }
}
