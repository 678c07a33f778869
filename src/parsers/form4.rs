// src/parsers/form4.rs
use super::model::{
    FilingMetadata, FormType, InsiderTradeData, InsiderTransaction, ParsedData, ParsedFiling,
    ReportingRelationship,
};
use super::section::{is_flag_set, parse_number, tag_blocks, tag_inner, tag_text};
use super::FilingParser;
use crate::utils::error::ParseError;

const TRANSACTION_TAG: &str = "nonDerivativeTransaction";
const PURCHASE_CODE: &str = "P";

/// Parser for Form 4 (insider trading) filings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Form4Parser;

impl Form4Parser {
    fn parse_relationship(&self, content: &str) -> Option<ReportingRelationship> {
        let block = tag_inner(content, "rptOwnerRelationship")?;
        Some(ReportingRelationship {
            is_director: is_flag_set(tag_text(block, "isDirector")),
            is_officer: is_flag_set(tag_text(block, "isOfficer")),
            is_ten_percent_owner: is_flag_set(tag_text(block, "isTenPercentOwner")),
            officer_title: tag_text(block, "officerTitle").map(str::to_string),
        })
    }

    fn parse_transaction(&self, block: &str) -> InsiderTransaction {
        let code = tag_text(block, "transactionCode").unwrap_or_default().to_string();
        let shares = parse_number(tag_text(block, "transactionShares"));
        let price = parse_number(tag_text(block, "transactionPricePerShare"));
        let date = tag_text(block, "transactionDate").unwrap_or_default().to_string();

        InsiderTransaction {
            is_purchase: code == PURCHASE_CODE,
            code,
            shares,
            price,
            date,
            value: shares * price,
        }
    }
}

impl FilingParser for Form4Parser {
    fn form_types(&self) -> &'static [FormType] {
        &[FormType::Form4]
    }

    fn parse(&self, content: &str, metadata: &FilingMetadata) -> Result<ParsedFiling, ParseError> {
        tracing::info!("Parsing Form 4 filing: {}", metadata.accession_number);
        self.check_metadata(metadata)?;

        let mut data = InsiderTradeData {
            reporting_person: tag_text(content, "rptOwnerName").map(str::to_string),
            relationship: self.parse_relationship(content),
            ..InsiderTradeData::default()
        };

        data.transactions = tag_blocks(content, TRANSACTION_TAG)
            .into_iter()
            .map(|block| self.parse_transaction(block))
            .collect();

        // Purchases only count when the reporting person is an insider.
        data.insider_buying = data.is_insider() && data.transactions.iter().any(|t| t.is_purchase);

        tracing::debug!(
            "Form 4 {}: {} transaction(s), insider buying = {}",
            metadata.accession_number,
            data.transactions.len(),
            data.insider_buying
        );

        Ok(ParsedFiling::new(content, metadata, ParsedData::InsiderTrade(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::metadata;

    fn parse(content: &str) -> InsiderTradeData {
        let filing = Form4Parser.parse(content, &metadata("4")).unwrap();
        match filing.parsed_data {
            ParsedData::InsiderTrade(data) => data,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    fn filing(relationship: &str, transactions: &[(&str, &str, &str)]) -> String {
        let mut xml = format!(
            "<ownershipDocument>\n<reportingOwner>\n<rptOwnerName>Jane Doe</rptOwnerName>\n\
             <rptOwnerRelationship>\n{relationship}\n</rptOwnerRelationship>\n</reportingOwner>\n\
             <nonDerivativeTable>\n"
        );
        for (code, shares, price) in transactions {
            xml.push_str(&format!(
                "<nonDerivativeTransaction>\n\
                 <transactionDate><value>2024-01-03</value></transactionDate>\n\
                 <transactionCoding><transactionCode>{code}</transactionCode></transactionCoding>\n\
                 <transactionAmounts>\n\
                 <transactionShares><value>{shares}</value></transactionShares>\n\
                 <transactionPricePerShare><value>{price}</value></transactionPricePerShare>\n\
                 </transactionAmounts>\n\
                 </nonDerivativeTransaction>\n"
            ));
        }
        xml.push_str("</nonDerivativeTable>\n</ownershipDocument>");
        xml
    }

    #[test]
    fn director_purchase_is_insider_buying() {
        let data = parse(&filing("<isDirector>1</isDirector>", &[("P", "1,000", "12.50")]));

        assert!(data.insider_buying);
        assert_eq!(data.reporting_person.as_deref(), Some("Jane Doe"));
        assert_eq!(data.transactions.len(), 1);
        let t = &data.transactions[0];
        assert_eq!(t.code, "P");
        assert_eq!(t.shares, 1000.0);
        assert_eq!(t.price, 12.5);
        assert_eq!(t.value, 12_500.0);
        assert_eq!(t.date, "2024-01-03");
        assert!(t.is_purchase);
    }

    #[test]
    fn sales_only_is_not_insider_buying() {
        let data = parse(&filing("<isDirector>1</isDirector>", &[("S", "500", "10")]));
        assert!(!data.insider_buying);
        assert!(!data.transactions[0].is_purchase);
    }

    #[test]
    fn purchase_by_non_insider_is_not_insider_buying() {
        let data = parse(&filing(
            "<isDirector>0</isDirector><isOfficer>false</isOfficer>",
            &[("P", "100", "1")],
        ));
        assert!(!data.insider_buying);
    }

    #[test]
    fn ten_percent_owner_alone_is_an_insider() {
        let data = parse(&filing(
            "<isDirector>0</isDirector><isOfficer>0</isOfficer>\
             <isTenPercentOwner>1</isTenPercentOwner>",
            &[("P", "100", "1")],
        ));
        assert!(data.relationship.as_ref().unwrap().is_ten_percent_owner);
        assert!(data.insider_buying);
    }

    #[test]
    fn collects_every_transaction_block() {
        let data = parse(&filing(
            "<isOfficer>true</isOfficer><officerTitle>CFO</officerTitle>",
            &[("S", "10", "2"), ("P", "20", "3"), ("M", "5", "0")],
        ));
        assert_eq!(data.transactions.len(), 3);
        assert!(data.insider_buying);
        let relationship = data.relationship.unwrap();
        assert!(relationship.is_officer);
        assert_eq!(relationship.officer_title.as_deref(), Some("CFO"));
    }

    #[test]
    fn malformed_document_yields_empty_payload() {
        let data = parse("<nonDerivativeTransaction><transactionCode>P</transactionCode>");
        assert!(data.transactions.is_empty());
        assert!(data.relationship.is_none());
        assert!(!data.insider_buying);
    }
}
