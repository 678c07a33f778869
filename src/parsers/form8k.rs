// src/parsers/form8k.rs
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::model::{CurrentReportData, FilingMetadata, FormType, ParsedData, ParsedFiling, Signals};
use super::section::has_keywords;
use super::FilingParser;
use crate::utils::error::ParseError;

/// Signals an 8-K item can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    NameChange,
    TickerChange,
    ReverseSplit,
    Buyback,
    Uplisting,
    FdaApproval,
    PatentApproval,
    SpinOff,
    SpecialDividend,
    DebtReduction,
}

impl Signal {
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Signal::NameChange => &[
                "name change", "corporate name change", "changing its name",
                "changed its name", "amendment to change the name",
            ],
            Signal::TickerChange => &[
                "ticker symbol change", "trading symbol change", "changed its ticker",
                "new ticker symbol", "symbol will change",
            ],
            Signal::ReverseSplit => &["reverse stock split", "reverse split", "share consolidation"],
            Signal::Buyback => &[
                "share repurchase", "stock buyback", "repurchase authorization",
                "repurchase program", "buyback program",
            ],
            Signal::Uplisting => &[
                "uplisting", "uplist", "approval to list", "nasdaq capital market",
                "nasdaq global", "nyse american", "listing on nasdaq",
            ],
            Signal::FdaApproval => &[
                "fda approval", "nda approval", "clinical trial results",
                "marketing authorization", "clearance from fda",
            ],
            Signal::PatentApproval => &[
                "patent approval", "patent issuance", "new patent",
                "patent office has granted", "patent has been issued",
            ],
            Signal::SpinOff => &["spin-off", "spinoff", "spin out", "spinout"],
            Signal::SpecialDividend => &[
                "special dividend", "special distribution", "one-time dividend",
                "extraordinary dividend", "distribution to shareholders",
            ],
            Signal::DebtReduction => &[
                "debt refinancing", "debt reduction", "extinguishment of debt",
                "early repayment", "debt repayment", "debt restructuring",
            ],
        }
    }

    fn flag(self, signals: &mut Signals) -> &mut bool {
        match self {
            Signal::NameChange => &mut signals.name_change,
            Signal::TickerChange => &mut signals.ticker_change,
            Signal::ReverseSplit => &mut signals.reverse_stock_split,
            Signal::Buyback => &mut signals.buyback,
            Signal::Uplisting => &mut signals.uplisting,
            Signal::FdaApproval => &mut signals.fda_approval,
            Signal::PatentApproval => &mut signals.patent_approval,
            Signal::SpinOff => &mut signals.spin_off,
            Signal::SpecialDividend => &mut signals.special_dividend,
            Signal::DebtReduction => &mut signals.debt_reduction,
        }
    }
}

/// An 8-K item we look for and the signals its body may carry.
struct ItemRule {
    code: &'static str,
    description: &'static str,
    signals: &'static [Signal],
}

const ITEM_RULES: &[ItemRule] = &[
    ItemRule {
        code: "5.03",
        description: "Amendments to Articles of Incorporation/Bylaws; Change in Fiscal Year",
        signals: &[Signal::NameChange, Signal::TickerChange, Signal::ReverseSplit],
    },
    ItemRule {
        code: "8.01",
        description: "Other Events",
        signals: &[
            Signal::Buyback,
            Signal::Uplisting,
            Signal::FdaApproval,
            Signal::PatentApproval,
            Signal::SpinOff,
            Signal::SpecialDividend,
        ],
    },
    ItemRule {
        code: "7.01",
        description: "Regulation FD Disclosure",
        signals: &[Signal::Buyback],
    },
    ItemRule {
        code: "2.01",
        description: "Completion of Acquisition or Disposition of Assets",
        signals: &[Signal::SpinOff],
    },
    ItemRule {
        code: "1.01",
        description: "Entry into a Material Definitive Agreement",
        signals: &[Signal::DebtReduction],
    },
    ItemRule {
        code: "2.03",
        description: "Creation of a Direct Financial Obligation",
        signals: &[Signal::DebtReduction],
    },
    ItemRule {
        code: "3.01",
        description: "Notice of Delisting or Failure to Satisfy Listing Rule",
        signals: &[Signal::Uplisting],
    },
];

// One heading pattern per rule, same order as ITEM_RULES.
static ITEM_HEADING_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    ITEM_RULES
        .iter()
        .map(|rule| {
            Regex::new(&format!(r"(?i)Item\s*{}[.\s]", regex::escape(rule.code)))
                .expect("Failed to compile 8-K item heading pattern")
        })
        .collect()
});

static ANY_ITEM_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Item\s*\d+\.\d+[.\s]").expect("Failed to compile ANY_ITEM_HEADING_RE")
});

/// Parser for Form 8-K current reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct Form8KParser;

impl Form8KParser {
    /// Body of the item whose heading `heading` matches: from the end of the
    /// heading up to the next `Item N.NN` heading or the end of the document.
    fn extract_item_content<'a>(&self, content: &'a str, heading: &Regex) -> Option<&'a str> {
        let start = heading.find(content)?.end();
        let end = ANY_ITEM_HEADING_RE
            .find(&content[start..])
            .map_or(content.len(), |m| start + m.start());
        Some(content[start..end].trim())
    }

    fn classify_item(&self, rule: &ItemRule, item_content: &str, signals: &mut Signals) {
        for &signal in rule.signals {
            let flag = signal.flag(signals);
            // A later item never clears a signal an earlier one raised.
            *flag = *flag || has_keywords(item_content, signal.keywords());
        }
    }
}

impl FilingParser for Form8KParser {
    fn form_types(&self) -> &'static [FormType] {
        &[FormType::EightK]
    }

    fn parse(&self, content: &str, metadata: &FilingMetadata) -> Result<ParsedFiling, ParseError> {
        tracing::info!("Parsing 8-K filing: {}", metadata.accession_number);
        self.check_metadata(metadata)?;

        let mut data = CurrentReportData::default();
        let mut item_contents = BTreeMap::new();

        for (rule, heading) in ITEM_RULES.iter().zip(ITEM_HEADING_RE.iter()) {
            let Some(item_content) = self.extract_item_content(content, heading) else {
                continue;
            };
            tracing::debug!(
                "8-K {} contains Item {} ({})",
                metadata.accession_number,
                rule.code,
                rule.description
            );
            data.items.push(rule.code.to_string());

            if !item_content.is_empty() {
                self.classify_item(rule, item_content, &mut data.signals);
                item_contents.insert(rule.code.to_string(), item_content.to_string());
            }
        }
        data.item_contents = item_contents;

        Ok(ParsedFiling::new(content, metadata, ParsedData::CurrentReport(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::metadata;

    fn parse(content: &str) -> CurrentReportData {
        let filing = Form8KParser.parse(content, &metadata("8-K")).unwrap();
        match filing.parsed_data {
            ParsedData::CurrentReport(data) => data,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn name_change_under_item_5_03() {
        let data = parse("Item 5.03. Amendments\nThe Company is changing its name to ExampleCo.\n");
        assert_eq!(data.items, vec!["5.03"]);
        assert!(data.signals.name_change);
        assert!(!data.signals.buyback);
    }

    #[test]
    fn buyback_keywords_outside_8_01_or_7_01_are_ignored() {
        let data = parse("Item 5.03 Amendments\nThe board approved a share repurchase program.\n");
        assert!(!data.signals.buyback);
    }

    #[test]
    fn item_body_stops_at_next_heading() {
        let content = "Item 8.01. Other Events\nThe Company announced a share repurchase program.\n\
                       Item 9.01. Financial Statements and Exhibits\nspin-off exhibit";
        let data = parse(content);
        assert!(data.signals.buyback);
        assert!(!data.signals.spin_off);
        assert_eq!(
            data.item_contents.get("8.01").map(String::as_str),
            Some("Other Events\nThe Company announced a share repurchase program.")
        );
    }

    #[test]
    fn signals_are_or_ed_across_items() {
        // 1.01 raises debt reduction; 2.03 has nothing and must not clear it.
        let content = "ITEM 1.01 Agreement\nThe lender agreed to a debt refinancing.\n\
                       ITEM 2.03 Obligation\nA new unsecured note.\n";
        let data = parse(content);
        assert_eq!(data.items, vec!["1.01", "2.03"]);
        assert!(data.signals.debt_reduction);
    }

    #[test]
    fn uplisting_from_item_3_01() {
        let data = parse("Item 3.01 Notice\nApproval to list on the Nasdaq Capital Market was granted.");
        assert!(data.signals.uplisting);
    }

    #[test]
    fn document_without_items_has_no_signals() {
        let data = parse("Press release with no item headings mentioning a stock buyback.");
        assert!(data.items.is_empty());
        assert_eq!(data.signals, Signals::default());
    }

    #[test]
    fn rejects_other_forms() {
        let err = Form8KParser.parse("Item 8.01", &metadata("10-Q")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedForm { .. }));
        assert!(Form8KParser.can_parse("8-K"));
        assert!(!Form8KParser.can_parse("8-K/A"));
    }
}
