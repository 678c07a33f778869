// src/parsers/mod.rs
pub mod factory;
pub mod form10q;
pub mod form13d;
pub mod form14a;
pub mod form4;
pub mod form8k;
pub mod model;
pub mod section;

use crate::utils::error::ParseError;

pub use factory::ParserFactory;
pub use form10q::Form10QParser;
pub use form13d::Form13DParser;
pub use form14a::Form14AParser;
pub use form4::Form4Parser;
pub use form8k::Form8KParser;
pub use model::{
    CurrentReportData, FilingMetadata, FormType, InsiderTradeData, InsiderTransaction,
    OwnershipData, ParsedData, ParsedFiling, ProxyData, QuarterlyReportData,
    ReportingRelationship, Signals,
};

/// A parser for one SEC form family.
///
/// Parsing is pure text scanning. Malformed content yields a partially filled
/// payload; only filings the parser cannot attribute (wrong form, no identity)
/// are rejected.
pub trait FilingParser: Send + Sync {
    /// Forms claimed by this parser.
    fn form_types(&self) -> &'static [FormType];

    fn parse(&self, content: &str, metadata: &FilingMetadata) -> Result<ParsedFiling, ParseError>;

    fn can_parse(&self, form_type: &str) -> bool {
        FormType::from_code(form_type).map_or(false, |form| self.form_types().contains(&form))
    }

    /// Checks the filing is one this parser claims and that it carries the
    /// identity fields event IDs are built from.
    fn check_metadata(&self, metadata: &FilingMetadata) -> Result<(), ParseError> {
        let result = if !self.can_parse(&metadata.form_type) {
            Err(ParseError::UnsupportedForm {
                form_type: metadata.form_type.clone(),
                accession_number: metadata.accession_number.clone(),
            })
        } else if metadata.accession_number.trim().is_empty() {
            Err(missing(metadata, "accessionNumber"))
        } else if metadata.cik.trim().is_empty() {
            Err(missing(metadata, "cik"))
        } else {
            Ok(())
        };

        if let Err(e) = &result {
            tracing::error!(
                "Error parsing {} filing {}: {}",
                metadata.form_type,
                metadata.accession_number,
                e
            );
        }
        result
    }
}

fn missing(metadata: &FilingMetadata, field: &'static str) -> ParseError {
    ParseError::MissingMetadata {
        form_type: metadata.form_type.clone(),
        accession_number: metadata.accession_number.clone(),
        field,
    }
}
