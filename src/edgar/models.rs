// src/edgar/models.rs
use serde::{Deserialize, Serialize};

use crate::parsers::model::FilingMetadata;
use crate::utils::error::EdgarError;

/// Structure representing the EDGAR company submission index.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
///
/// Only the fields the fetcher reads are modelled; everything else in the
/// response is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanySubmission {
    pub cik: String,
    pub name: String,
    pub tickers: Vec<String>,
    pub exchanges: Vec<String>,
    pub filings: Filings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Column-oriented list: entry `i` of every vector describes the same filing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilingsList {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

impl CompanySubmission {
    /// Primary ticker, used to enrich events after extraction.
    pub fn ticker(&self) -> Option<&str> {
        self.tickers.first().map(String::as_str)
    }

    /// Recent filings whose form is in `form_types` (every form when empty),
    /// newest first, at most `limit`.
    pub fn recent_filings(
        &self,
        cik: &str,
        form_types: &[String],
        limit: usize,
    ) -> Result<Vec<FilingInfo>, EdgarError> {
        let recent = &self.filings.recent;
        let mut filings = Vec::new();

        for (i, form) in recent.form.iter().enumerate() {
            if !form_types.is_empty() && !form_types.iter().any(|f| f == form) {
                continue;
            }

            let accession_number = recent
                .accession_number
                .get(i)
                .ok_or_else(|| EdgarError::Parse("Missing accession number".to_string()))?;
            let filing_date = recent
                .filing_date
                .get(i)
                .ok_or_else(|| EdgarError::Parse("Missing filing date".to_string()))?;

            filings.push(FilingInfo {
                accession_number: accession_number.clone(),
                filing_date: filing_date.clone(),
                form_type: form.clone(),
                ticker: self.ticker().map(str::to_string),
                company_name: self.name.clone(),
                cik: cik.to_string(),
                primary_doc: recent.primary_document.get(i).cloned().unwrap_or_default(),
            });
        }

        // ISO dates sort lexically (newest first)
        filings.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
        filings.truncate(limit);
        Ok(filings)
    }
}

/// Simple struct representing a specific filing we want to process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingInfo {
    pub accession_number: String,
    pub filing_date: String,
    pub form_type: String,
    pub ticker: Option<String>,
    pub company_name: String,
    /// Unpadded.
    pub cik: String,
    pub primary_doc: String,
}

impl FilingInfo {
    fn archive_folder(&self) -> String {
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}",
            self.cik,
            self.accession_number.replace('-', "")
        )
    }

    /// Constructs the URL to access the primary document of this filing
    pub fn primary_doc_url(&self) -> String {
        format!("{}/{}", self.archive_folder(), self.primary_doc)
    }

    /// The complete submission text file, SEC header included.
    pub fn full_text_url(&self) -> String {
        format!("{}/{}.txt", self.archive_folder(), self.accession_number)
    }

    pub fn to_metadata(&self) -> FilingMetadata {
        FilingMetadata {
            accession_number: self.accession_number.clone(),
            cik: self.cik.clone(),
            company_name: self.company_name.clone(),
            filing_date: self.filing_date.clone(),
            form_type: self.form_type.clone(),
        }
    }
}

/// Strips zero padding: "0000320193" becomes "320193".
pub fn normalize_cik(cik: &str) -> Result<String, EdgarError> {
    let cik = cik.trim();
    if cik.is_empty() || cik.len() > 10 || !cik.chars().all(|c| c.is_ascii_digit()) {
        return Err(EdgarError::InvalidCik(cik.to_string()));
    }
    let trimmed = cik.trim_start_matches('0');
    if trimmed.is_empty() {
        return Err(EdgarError::InvalidCik(cik.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Ten-digit form used by the submissions API.
pub fn pad_cik(cik: &str) -> Result<String, EdgarError> {
    Ok(format!("{:0>10}", normalize_cik(cik)?))
}
