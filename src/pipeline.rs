// src/pipeline.rs
use std::borrow::Cow;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::events::{Event, EventExtractor};
use crate::parsers::model::{FilingMetadata, FormType};
use crate::parsers::ParserFactory;
use crate::utils::error::ParseError;
use crate::utils::html;

pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// A filing waiting to be processed.
#[derive(Debug, Clone)]
pub struct RawFiling {
    pub content: String,
    pub metadata: FilingMetadata,
}

/// What happened to one filing of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Extracted {
        accession_number: String,
        events: Vec<Event>,
    },
    /// No parser claims the form type.
    Skipped {
        accession_number: String,
        form_type: String,
    },
    Failed {
        accession_number: String,
        error: String,
    },
}

impl BatchOutcome {
    pub fn events(&self) -> &[Event] {
        match self {
            BatchOutcome::Extracted { events, .. } => events,
            _ => &[],
        }
    }
}

/// Dispatch, parse and extract for single filings or batches.
#[derive(Debug, Clone)]
pub struct FilingPipeline {
    factory: ParserFactory,
    extractor: EventExtractor,
    normalize_html: bool,
    concurrency: usize,
}

impl FilingPipeline {
    pub fn new() -> Self {
        Self {
            factory: ParserFactory::new(),
            extractor: EventExtractor::new(),
            normalize_html: true,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_normalize_html(config.normalize_html)
            .with_concurrency(config.batch_concurrency)
    }

    pub fn with_normalize_html(mut self, normalize_html: bool) -> Self {
        self.normalize_html = normalize_html;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn factory(&self) -> &ParserFactory {
        &self.factory
    }

    /// Events for one filing, or `None` when no parser claims its form type.
    pub fn process(
        &self,
        content: &str,
        metadata: &FilingMetadata,
    ) -> Result<Option<Vec<Event>>, ParseError> {
        let Some(parser) = self.factory.get_parser(&metadata.form_type) else {
            return Ok(None);
        };

        let text = self.prepare_content(content, &metadata.form_type);
        let parsed = parser.parse(&text, metadata)?;
        Ok(Some(self.extractor.extract_events(&parsed)))
    }

    /// Processes filings concurrently, one task per filing. Outcomes come back
    /// in input order and a failed filing never stops the rest.
    pub async fn process_batch(&self, filings: Vec<RawFiling>) -> Vec<BatchOutcome> {
        tracing::info!(
            "Processing batch of {} filings (concurrency {})",
            filings.len(),
            self.concurrency
        );
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let mut handles = Vec::with_capacity(filings.len());
        for filing in filings {
            let accession_number = filing.metadata.accession_number.clone();
            let pipeline = self.clone();
            let sem = semaphore.clone();

            let handle = tokio::spawn(async move {
                // The semaphore is never closed, so acquire only fails on shutdown.
                let _permit = sem.acquire_owned().await.ok();
                pipeline.outcome(&filing)
            });
            handles.push((accession_number, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (accession_number, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|e| {
                tracing::error!("Task for filing {} did not complete: {}", accession_number, e);
                BatchOutcome::Failed {
                    accession_number,
                    error: e.to_string(),
                }
            });
            outcomes.push(outcome);
        }
        outcomes
    }

    fn outcome(&self, filing: &RawFiling) -> BatchOutcome {
        let accession_number = filing.metadata.accession_number.clone();
        match self.process(&filing.content, &filing.metadata) {
            Ok(Some(events)) => BatchOutcome::Extracted {
                accession_number,
                events,
            },
            Ok(None) => BatchOutcome::Skipped {
                accession_number,
                form_type: filing.metadata.form_type.clone(),
            },
            Err(e) => BatchOutcome::Failed {
                accession_number,
                error: e.to_string(),
            },
        }
    }

    /// HTML bodies of prose forms are flattened to text; ownership XML is
    /// passed through untouched.
    fn prepare_content<'a>(&self, content: &'a str, form_type: &str) -> Cow<'a, str> {
        let is_prose = FormType::from_code(form_type).map_or(false, |f| !f.is_xml_document());
        if self.normalize_html && is_prose && html::looks_like_html(content) {
            tracing::debug!("Normalising HTML content for {} filing", form_type);
            Cow::Owned(html::to_plain_text(content))
        } else {
            Cow::Borrowed(content)
        }
    }
}

impl Default for FilingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;

    fn metadata(form_type: &str, accession_number: &str) -> FilingMetadata {
        FilingMetadata {
            accession_number: accession_number.to_string(),
            cik: "123".to_string(),
            company_name: "Acme".to_string(),
            filing_date: "2024-01-05".to_string(),
            form_type: form_type.to_string(),
        }
    }

    const BUYBACK_8K: &str = "Item 8.01. Other Events\nThe Company announced a share repurchase program of up to $10 million.\nItem 9.01 Financial Statements";

    #[test]
    fn unclaimed_form_is_not_an_error() {
        let pipeline = FilingPipeline::new();
        assert_eq!(pipeline.process("anything", &metadata("10-K", "0001-23")), Ok(None));
    }

    #[test]
    fn missing_accession_number_propagates() {
        let pipeline = FilingPipeline::new();
        let result = pipeline.process(BUYBACK_8K, &metadata("8-K", ""));
        assert!(matches!(result, Err(ParseError::MissingMetadata { field: "accessionNumber", .. })));
    }

    #[test]
    fn html_eight_k_is_normalised_before_parsing() {
        let content = "<html><body><p>Item&nbsp;8.01. Other Events</p>\
                       <p>The Company announced a share repurchase program of up to $10 million.</p>\
                       <p>Item 9.01 Financial Statements</p></body></html>";
        let events = FilingPipeline::new()
            .process(content, &metadata("8-K", "0001-23"))
            .unwrap()
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::ShareBuyback);

        let raw = FilingPipeline::new()
            .with_normalize_html(false)
            .process(content, &metadata("8-K", "0001-23"))
            .unwrap()
            .unwrap();
        // "Item&nbsp;8.01" is not an item heading until the entity is decoded.
        assert!(raw.is_empty());
    }

    #[test]
    fn batch_preserves_input_order() {
        let filings = vec![
            RawFiling {
                content: BUYBACK_8K.to_string(),
                metadata: metadata("8-K", "0001-01"),
            },
            RawFiling {
                content: "annual report".to_string(),
                metadata: metadata("10-K", "0001-02"),
            },
            RawFiling {
                content: BUYBACK_8K.to_string(),
                metadata: metadata("8-K", ""),
            },
            RawFiling {
                content: BUYBACK_8K.to_string(),
                metadata: metadata("8-K", "0001-04"),
            },
        ];

        let pipeline = FilingPipeline::new().with_concurrency(2);
        let outcomes = tokio_test::block_on(pipeline.process_batch(filings));

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].events()[0].id, "shareBuyback-123-0001-01");
        assert_eq!(
            outcomes[1],
            BatchOutcome::Skipped {
                accession_number: "0001-02".to_string(),
                form_type: "10-K".to_string(),
            }
        );
        assert!(matches!(outcomes[2], BatchOutcome::Failed { .. }));
        assert_eq!(outcomes[3].events()[0].id, "shareBuyback-123-0001-04");
    }
}
