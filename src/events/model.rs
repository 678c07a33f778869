// src/events/model.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsers::model::{FilingMetadata, InsiderTransaction, ReportingRelationship};

/// Closed set of corporate event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    NameChange,
    TickerChange,
    InsiderBuying,
    ActivistInvestor,
    InstitutionalInvestor,
    ShareBuyback,
    ReverseStockSplit,
    Uplisting,
    FdaApproval,
    PatentApproval,
    SpinOff,
    SpecialDividend,
    DebtReduction,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NameChange => "nameChange",
            EventType::TickerChange => "tickerChange",
            EventType::InsiderBuying => "insiderBuying",
            EventType::ActivistInvestor => "activistInvestor",
            EventType::InstitutionalInvestor => "institutionalInvestor",
            EventType::ShareBuyback => "shareBuyback",
            EventType::ReverseStockSplit => "reverseStockSplit",
            EventType::Uplisting => "uplisting",
            EventType::FdaApproval => "fdaApproval",
            EventType::PatentApproval => "patentApproval",
            EventType::SpinOff => "spinOff",
            EventType::SpecialDividend => "specialDividend",
            EventType::DebtReduction => "debtReduction",
        }
    }

    /// Status an event starts with. Disclosures of things that already happened
    /// are completed; announcements of future actions are pending.
    pub fn default_status(&self) -> EventStatus {
        match self {
            EventType::InsiderBuying
            | EventType::ActivistInvestor
            | EventType::InstitutionalInvestor
            | EventType::FdaApproval
            | EventType::PatentApproval => EventStatus::Completed,
            EventType::NameChange
            | EventType::TickerChange
            | EventType::ShareBuyback
            | EventType::ReverseStockSplit
            | EventType::Uplisting
            | EventType::SpinOff
            | EventType::SpecialDividend
            | EventType::DebtReduction => EventStatus::Pending,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            EventType::NameChange => "Company name change announced",
            EventType::TickerChange => "Ticker symbol change announced",
            EventType::InsiderBuying => "Insider buying activity reported",
            EventType::ActivistInvestor => "Activist investor stake reported",
            EventType::InstitutionalInvestor => "Large institutional investor stake reported",
            EventType::ShareBuyback => "Share buyback program announced",
            EventType::ReverseStockSplit => "Reverse stock split announced",
            EventType::Uplisting => "Uplisting to major exchange announced",
            EventType::FdaApproval => "FDA approval announced",
            EventType::PatentApproval => "Patent approval or issuance announced",
            EventType::SpinOff => "Spin-off of business unit announced",
            EventType::SpecialDividend => "Special dividend announced",
            EventType::DebtReduction => "Significant debt reduction or refinancing announced",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Completed,
    Cancelled,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameChangeDetails {
    pub old_name: String,
    pub new_name: Option<String>,
    pub effective_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerChangeDetails {
    pub old_ticker: Option<String>,
    pub new_ticker: Option<String>,
    pub effective_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsiderBuyingDetails {
    pub reporting_person: Option<String>,
    pub relationship: Option<ReportingRelationship>,
    pub transactions: Vec<InsiderTransaction>,
    /// Purchases only.
    pub total_shares: f64,
    /// Purchases only.
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipDetails {
    pub investor: Option<String>,
    pub percent_owned: f64,
    pub purpose: Option<String>,
    pub cusip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBuybackDetails {
    /// Dollars.
    pub amount: Option<f64>,
    pub shares: Option<u64>,
    pub program_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseSplitDetails {
    pub ratio: Option<String>,
    pub effective_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplistingDetails {
    pub current_exchange: Option<String>,
    pub target_exchange: Option<String>,
    pub effective_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdaApprovalDetails {
    pub product: Option<String>,
    pub approval_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentApprovalDetails {
    pub patent_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOffDetails {
    pub unit_name: Option<String>,
    pub record_date: Option<String>,
    pub distribution_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDividendDetails {
    /// Dollars per share.
    pub amount: Option<f64>,
    pub record_date: Option<String>,
    pub payment_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtReductionDetails {
    /// Dollars.
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub debt_type: String,
}

/// Type-specific payload. The variant decides the event type, so an event's
/// `type` and `details` can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    NameChange(NameChangeDetails),
    TickerChange(TickerChangeDetails),
    InsiderBuying(InsiderBuyingDetails),
    ActivistInvestor(OwnershipDetails),
    InstitutionalInvestor(OwnershipDetails),
    ShareBuyback(ShareBuybackDetails),
    ReverseStockSplit(ReverseSplitDetails),
    Uplisting(UplistingDetails),
    FdaApproval(FdaApprovalDetails),
    PatentApproval(PatentApprovalDetails),
    SpinOff(SpinOffDetails),
    SpecialDividend(SpecialDividendDetails),
    DebtReduction(DebtReductionDetails),
}

impl EventDetails {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetails::NameChange(_) => EventType::NameChange,
            EventDetails::TickerChange(_) => EventType::TickerChange,
            EventDetails::InsiderBuying(_) => EventType::InsiderBuying,
            EventDetails::ActivistInvestor(_) => EventType::ActivistInvestor,
            EventDetails::InstitutionalInvestor(_) => EventType::InstitutionalInvestor,
            EventDetails::ShareBuyback(_) => EventType::ShareBuyback,
            EventDetails::ReverseStockSplit(_) => EventType::ReverseStockSplit,
            EventDetails::Uplisting(_) => EventType::Uplisting,
            EventDetails::FdaApproval(_) => EventType::FdaApproval,
            EventDetails::PatentApproval(_) => EventType::PatentApproval,
            EventDetails::SpinOff(_) => EventType::SpinOff,
            EventDetails::SpecialDividend(_) => EventType::SpecialDividend,
            EventDetails::DebtReduction(_) => EventType::DebtReduction,
        }
    }

    /// Decodes a stored `details` object using the event's `type` tag.
    pub fn from_value(event_type: EventType, value: serde_json::Value) -> serde_json::Result<Self> {
        use serde_json::from_value;
        Ok(match event_type {
            EventType::NameChange => EventDetails::NameChange(from_value(value)?),
            EventType::TickerChange => EventDetails::TickerChange(from_value(value)?),
            EventType::InsiderBuying => EventDetails::InsiderBuying(from_value(value)?),
            EventType::ActivistInvestor => EventDetails::ActivistInvestor(from_value(value)?),
            EventType::InstitutionalInvestor => EventDetails::InstitutionalInvestor(from_value(value)?),
            EventType::ShareBuyback => EventDetails::ShareBuyback(from_value(value)?),
            EventType::ReverseStockSplit => EventDetails::ReverseStockSplit(from_value(value)?),
            EventType::Uplisting => EventDetails::Uplisting(from_value(value)?),
            EventType::FdaApproval => EventDetails::FdaApproval(from_value(value)?),
            EventType::PatentApproval => EventDetails::PatentApproval(from_value(value)?),
            EventType::SpinOff => EventDetails::SpinOff(from_value(value)?),
            EventType::SpecialDividend => EventDetails::SpecialDividend(from_value(value)?),
            EventType::DebtReduction => EventDetails::DebtReduction(from_value(value)?),
        })
    }
}

/// A corporate event derived from one filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEvent")]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub cik: String,
    pub company_name: String,
    pub ticker: Option<String>,
    pub identified_date: NaiveDate,
    pub execution_date: Option<NaiveDate>,
    pub source_form_type: String,
    pub source_accession_number: String,
    pub source_url: Option<String>,
    pub description: String,
    pub details: EventDetails,
    pub status: EventStatus,
}

impl Event {
    /// Builds an event for `metadata` with the type's description and default
    /// status. The ID is `{type}-{cik}-{accessionNumber}`, so re-processing a
    /// filing reproduces the same IDs.
    pub fn new(metadata: &FilingMetadata, identified_date: NaiveDate, details: EventDetails) -> Self {
        let event_type = details.event_type();
        Self {
            id: Self::make_id(event_type, &metadata.cik, &metadata.accession_number),
            event_type,
            cik: metadata.cik.clone(),
            company_name: metadata.company_name.clone(),
            ticker: None,
            identified_date,
            execution_date: None,
            source_form_type: metadata.form_type.clone(),
            source_accession_number: metadata.accession_number.clone(),
            source_url: Some(metadata.source_url()),
            description: event_type.description().to_string(),
            details,
            status: event_type.default_status(),
        }
    }

    pub fn make_id(event_type: EventType, cik: &str, accession_number: &str) -> String {
        format!("{}-{}-{}", event_type, cik, accession_number)
    }

    pub fn with_execution_date(mut self, date: Option<NaiveDate>) -> Self {
        self.execution_date = date;
        self
    }
}

// Wire shape used to decode stored events; `details` is resolved against `type`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: EventType,
    cik: String,
    company_name: String,
    #[serde(default)]
    ticker: Option<String>,
    identified_date: NaiveDate,
    #[serde(default)]
    execution_date: Option<NaiveDate>,
    source_form_type: String,
    source_accession_number: String,
    #[serde(default)]
    source_url: Option<String>,
    description: String,
    details: serde_json::Value,
    status: EventStatus,
}

impl TryFrom<RawEvent> for Event {
    type Error = serde_json::Error;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Ok(Event {
            details: EventDetails::from_value(raw.event_type, raw.details)?,
            id: raw.id,
            event_type: raw.event_type,
            cik: raw.cik,
            company_name: raw.company_name,
            ticker: raw.ticker,
            identified_date: raw.identified_date,
            execution_date: raw.execution_date,
            source_form_type: raw.source_form_type,
            source_accession_number: raw.source_accession_number,
            source_url: raw.source_url,
            description: raw.description,
            status: raw.status,
        })
    }
}
