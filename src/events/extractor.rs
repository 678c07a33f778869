// src/events/extractor.rs
use chrono::NaiveDate;

use super::fields;
use super::model::*;
use crate::parsers::model::{ParsedData, ParsedFiling};
use crate::parsers::section::has_keywords;
use crate::utils::error::ExtractError;

/// Stakes at or below this percentage of the class are not reported.
const OWNERSHIP_THRESHOLD: f64 = 5.0;

const BUYBACK_TERMS: &[&str] = &["repurchase", "buyback", "buy back"];

/// Turns parsed filings into canonical events.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventExtractor;

impl EventExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Events for one filing. A filing that cannot be turned into events is
    /// logged and yields an empty list so a batch keeps going.
    pub fn extract_events(&self, filing: &ParsedFiling) -> Vec<Event> {
        match self.try_extract_events(filing) {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(
                    "Error extracting events from filing {}: {}",
                    filing.metadata.accession_number,
                    e
                );
                Vec::new()
            }
        }
    }

    pub fn try_extract_events(&self, filing: &ParsedFiling) -> Result<Vec<Event>, ExtractError> {
        let metadata = &filing.metadata;
        tracing::info!(
            "Extracting events from {} filing: {}",
            metadata.form_type,
            metadata.accession_number
        );

        let identified_date = fields::parse_filing_date(&metadata.filing_date).ok_or_else(|| {
            ExtractError::InvalidFilingDate {
                accession_number: metadata.accession_number.clone(),
                date: metadata.filing_date.clone(),
            }
        })?;

        let content = filing.content.as_str();
        let data = &filing.parsed_data;
        let signals = data.signals();
        let mut events = Vec::new();
        let mut push = |details: EventDetails, execution: Option<&String>| {
            let event = Event::new(metadata, identified_date, details)
                .with_execution_date(execution.and_then(|d| iso_date(d)));
            tracing::debug!("Identified {} event {}", event.event_type, event.id);
            events.push(event);
        };

        if signals.name_change {
            let details = NameChangeDetails {
                old_name: metadata.company_name.clone(),
                new_name: fields::new_name(content),
                effective_date: fields::effective_date(content),
            };
            let execution = details.effective_date.clone();
            push(EventDetails::NameChange(details), execution.as_ref());
        }

        if signals.ticker_change {
            let details = TickerChangeDetails {
                old_ticker: fields::old_ticker(content),
                new_ticker: fields::new_ticker(content),
                effective_date: fields::effective_date(content),
            };
            let execution = details.effective_date.clone();
            push(EventDetails::TickerChange(details), execution.as_ref());
        }

        if let ParsedData::InsiderTrade(trade) = data {
            if signals.insider_buying {
                let purchases = trade.transactions.iter().filter(|t| t.is_purchase);
                let (total_shares, total_value) = purchases
                    .fold((0.0, 0.0), |(shares, value), t| (shares + t.shares, value + t.value));
                push(
                    EventDetails::InsiderBuying(InsiderBuyingDetails {
                        reporting_person: trade.reporting_person.clone(),
                        relationship: trade.relationship.clone(),
                        transactions: trade.transactions.clone(),
                        total_shares,
                        total_value,
                    }),
                    None,
                );
            }
        }

        if let ParsedData::BeneficialOwnership(ownership) = data {
            if ownership.percent_owned > OWNERSHIP_THRESHOLD {
                let details = OwnershipDetails {
                    investor: ownership.reporting_person.clone(),
                    percent_owned: ownership.percent_owned,
                    purpose: ownership.purpose.clone(),
                    cusip: ownership.cusip.clone(),
                };
                let details = if ownership.is_activist {
                    EventDetails::ActivistInvestor(details)
                } else {
                    EventDetails::InstitutionalInvestor(details)
                };
                push(details, None);
            } else {
                tracing::debug!(
                    "Stake of {}% in filing {} is below the reporting threshold",
                    ownership.percent_owned,
                    metadata.accession_number
                );
            }
        }

        if signals.buyback {
            push(EventDetails::ShareBuyback(self.buyback_details(data, content)), None);
        }

        if signals.reverse_stock_split {
            let ratio = match data {
                ParsedData::ProxyStatement(proxy) => proxy.split_ratio.clone(),
                _ => None,
            };
            let details = ReverseSplitDetails {
                ratio: ratio.or_else(|| fields::split_ratio(content)),
                effective_date: fields::effective_date(content),
            };
            let execution = details.effective_date.clone();
            push(EventDetails::ReverseStockSplit(details), execution.as_ref());
        }

        if signals.uplisting {
            let details = UplistingDetails {
                current_exchange: Some(fields::current_exchange(content)),
                target_exchange: fields::target_exchange(content),
                effective_date: fields::effective_date(content),
            };
            let execution = details.effective_date.clone();
            push(EventDetails::Uplisting(details), execution.as_ref());
        }

        if signals.fda_approval {
            push(
                EventDetails::FdaApproval(FdaApprovalDetails {
                    product: fields::product_name(content),
                    approval_type: fields::approval_type(content),
                }),
                None,
            );
        }

        if signals.patent_approval {
            let patent_info = match data {
                ParsedData::QuarterlyReport(report) => report.patent_info.clone(),
                ParsedData::CurrentReport(report) => report.item_contents.get("8.01").cloned(),
                _ => None,
            };
            push(EventDetails::PatentApproval(PatentApprovalDetails { patent_info }), None);
        }

        if signals.spin_off {
            let details = SpinOffDetails {
                unit_name: fields::spin_off_unit_name(content),
                record_date: fields::record_date(content),
                distribution_date: fields::distribution_date(content),
            };
            let execution = details.distribution_date.clone();
            push(EventDetails::SpinOff(details), execution.as_ref());
        }

        if signals.special_dividend {
            let details = SpecialDividendDetails {
                amount: fields::dividend_amount(content),
                record_date: fields::record_date(content),
                payment_date: fields::payment_date(content),
            };
            let execution = details.payment_date.clone();
            push(EventDetails::SpecialDividend(details), execution.as_ref());
        }

        if signals.debt_reduction {
            push(
                EventDetails::DebtReduction(DebtReductionDetails {
                    amount: fields::debt_amount(content),
                    debt_type: fields::debt_reduction_type(content),
                }),
                None,
            );
        }

        tracing::info!(
            "Extracted {} events from filing {}",
            events.len(),
            metadata.accession_number
        );
        Ok(events)
    }

    fn buyback_details(&self, data: &ParsedData, content: &str) -> ShareBuybackDetails {
        match data {
            ParsedData::QuarterlyReport(report) => ShareBuybackDetails {
                amount: report
                    .buyback_amount
                    .or_else(|| report.buyback_details.as_deref().and_then(fields::buyback_amount)),
                shares: report.total_shares_repurchased,
                program_details: report.buyback_details.clone(),
            },
            ParsedData::CurrentReport(report) => {
                let program = ["8.01", "7.01"]
                    .iter()
                    .filter_map(|code| report.item_contents.get(*code))
                    .find(|body| has_keywords(body, BUYBACK_TERMS));
                ShareBuybackDetails {
                    amount: program
                        .and_then(|body| fields::buyback_amount(body))
                        .or_else(|| fields::buyback_amount(content)),
                    shares: None,
                    program_details: program.cloned(),
                }
            }
            _ => ShareBuybackDetails {
                amount: fields::buyback_amount(content),
                shares: None,
                program_details: None,
            },
        }
    }
}

/// Only details that normalised to `YYYY-MM-DD` become an execution date.
fn iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
