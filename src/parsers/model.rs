// src/parsers/model.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata supplied alongside the raw filing text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingMetadata {
    pub accession_number: String,
    pub cik: String,
    pub company_name: String,
    pub filing_date: String,
    pub form_type: String,
}

impl FilingMetadata {
    /// Link to the full-text submission in the SEC archive.
    pub fn source_url(&self) -> String {
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}.txt",
            self.cik,
            self.accession_number.replace('-', ""),
            self.accession_number
        )
    }
}

/// Form families with a dedicated parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormType {
    EightK,
    Form4,
    Schedule13D,
    TenQ,
    Def14A,
    Pre14A,
}

impl FormType {
    pub const ALL: [FormType; 6] = [
        FormType::EightK,
        FormType::Form4,
        FormType::Schedule13D,
        FormType::TenQ,
        FormType::Def14A,
        FormType::Pre14A,
    ];

    /// Exact match on the SEC form code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::EightK => "8-K",
            FormType::Form4 => "4",
            FormType::Schedule13D => "SC 13D",
            FormType::TenQ => "10-Q",
            FormType::Def14A => "DEF 14A",
            FormType::Pre14A => "PRE 14A",
        }
    }

    /// Forms whose body is ownership XML rather than prose. Their content must
    /// reach the parser untouched.
    pub fn is_xml_document(&self) -> bool {
        matches!(self, FormType::Form4 | FormType::Schedule13D)
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a form parser: the metadata, the verbatim content and the typed
/// signal payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFiling {
    #[serde(flatten)]
    pub metadata: FilingMetadata,
    pub content: String,
    pub parsed_data: ParsedData,
}

impl ParsedFiling {
    pub fn new(content: &str, metadata: &FilingMetadata, parsed_data: ParsedData) -> Self {
        Self {
            metadata: metadata.clone(),
            content: content.to_string(),
            parsed_data,
        }
    }
}

/// Boolean event signals. A parser only ever sets the flags its form can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    pub name_change: bool,
    pub ticker_change: bool,
    pub insider_buying: bool,
    pub buyback: bool,
    pub reverse_stock_split: bool,
    pub uplisting: bool,
    pub fda_approval: bool,
    pub patent_approval: bool,
    pub spin_off: bool,
    pub special_dividend: bool,
    pub debt_reduction: bool,
}

/// Per-form intermediate representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedData {
    CurrentReport(CurrentReportData),
    InsiderTrade(InsiderTradeData),
    BeneficialOwnership(OwnershipData),
    QuarterlyReport(QuarterlyReportData),
    ProxyStatement(ProxyData),
}

impl ParsedData {
    pub fn signals(&self) -> Signals {
        match self {
            ParsedData::CurrentReport(data) => data.signals,
            ParsedData::InsiderTrade(data) => Signals {
                insider_buying: data.insider_buying,
                ..Signals::default()
            },
            // Ownership events are threshold-driven, not flag-driven.
            ParsedData::BeneficialOwnership(_) => Signals::default(),
            ParsedData::QuarterlyReport(data) => Signals {
                buyback: data.buyback,
                patent_approval: data.new_patents,
                ..Signals::default()
            },
            ParsedData::ProxyStatement(data) => Signals {
                name_change: data.name_change_details.is_some(),
                reverse_stock_split: data.reverse_split_details.is_some(),
                special_dividend: data.special_dividend_details.is_some(),
                ..Signals::default()
            },
        }
    }
}

/// 8-K: matched item codes, each item's body, and the OR of all item signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentReportData {
    pub items: Vec<String>,
    pub item_contents: BTreeMap<String, String>,
    #[serde(flatten)]
    pub signals: Signals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderTradeData {
    pub insider_buying: bool,
    pub reporting_person: Option<String>,
    pub relationship: Option<ReportingRelationship>,
    pub transactions: Vec<InsiderTransaction>,
}

impl InsiderTradeData {
    pub fn is_insider(&self) -> bool {
        self.relationship
            .as_ref()
            .map_or(false, ReportingRelationship::is_insider)
    }
}

/// Contents of `<rptOwnerRelationship>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingRelationship {
    pub is_director: bool,
    pub is_officer: bool,
    pub is_ten_percent_owner: bool,
    pub officer_title: Option<String>,
}

impl ReportingRelationship {
    pub fn is_insider(&self) -> bool {
        self.is_director || self.is_officer || self.is_ten_percent_owner
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderTransaction {
    pub code: String,
    pub shares: f64,
    pub price: f64,
    pub date: String,
    pub value: f64,
    pub is_purchase: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipData {
    pub reporting_person: Option<String>,
    pub cusip: Option<String>,
    pub issuer_name: Option<String>,
    pub percent_owned: f64,
    pub purpose: Option<String>,
    pub is_activist: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyReportData {
    pub buyback: bool,
    pub buyback_details: Option<String>,
    pub total_shares_repurchased: Option<u64>,
    /// Dollars.
    pub buyback_amount: Option<f64>,
    pub patent_info: Option<String>,
    pub new_patents: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyData {
    pub name_change_details: Option<String>,
    pub reverse_split_details: Option<String>,
    pub split_ratio: Option<String>,
    pub special_dividend_details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_codes_match_exactly() {
        assert_eq!(FormType::from_code("8-K"), Some(FormType::EightK));
        assert_eq!(FormType::from_code("SC 13D"), Some(FormType::Schedule13D));
        assert_eq!(FormType::from_code("PRE 14A"), Some(FormType::Pre14A));
        assert_eq!(FormType::from_code("8-k"), None);
        assert_eq!(FormType::from_code("SC 13G"), None);
        for form in FormType::ALL {
            assert_eq!(FormType::from_code(form.as_str()), Some(form));
        }
    }

    #[test]
    fn source_url_strips_dashes_from_folder_only() {
        let metadata = FilingMetadata {
            accession_number: "0000320193-24-000006".to_string(),
            cik: "320193".to_string(),
            company_name: "Apple Inc.".to_string(),
            filing_date: "2024-01-05".to_string(),
            form_type: "8-K".to_string(),
        };
        assert_eq!(
            metadata.source_url(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000006/0000320193-24-000006.txt"
        );
    }

    #[test]
    fn proxy_signals_follow_matched_paragraphs() {
        let data = ParsedData::ProxyStatement(ProxyData {
            reverse_split_details: Some("approve a reverse stock split".to_string()),
            ..ProxyData::default()
        });
        let signals = data.signals();
        assert!(signals.reverse_stock_split);
        assert!(!signals.name_change);
        assert!(!signals.special_dividend);
    }
}
