// src/edgar/client.rs
use std::time::Duration;

use reqwest::header;

use crate::edgar::models::{pad_cik, normalize_cik, CompanySubmission, FilingInfo};
use crate::utils::error::EdgarError;

const SUBMISSIONS_BASE_URL: &str = "https://data.sec.gov/submissions";

/// EDGAR HTTP client. Every request carries the mandatory User-Agent and is
/// preceded by a fixed politeness delay.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
    user_agent: String,
    request_delay: Duration,
}

impl EdgarClient {
    pub fn new(user_agent: &str, request_delay: Duration) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent) // Set the required User-Agent
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            user_agent: user_agent.to_string(),
            request_delay,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, EdgarError> {
        tracing::debug!("GET {} (User-Agent: {})", url, self.user_agent);

        // Requests are issued one at a time, so a fixed delay keeps us under
        // the SEC's 10 requests/second.
        tokio::time::sleep(self.request_delay).await;

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json,application/xml,text/html,text/plain,*/*")
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        check_status(response.status(), url)?;
        Ok(response)
    }

    /// Fetches the company submission data for a given CIK (padded or not).
    pub async fn get_company_submissions(&self, cik: &str) -> Result<CompanySubmission, EdgarError> {
        let url = format!("{}/CIK{}.json", SUBMISSIONS_BASE_URL, pad_cik(cik)?);
        tracing::info!("Fetching submissions index: {}", url);

        let response = self.get(&url).await?;
        let submission: CompanySubmission = response
            .json()
            .await
            .map_err(|e| EdgarError::Parse(e.to_string()))?;
        Ok(submission)
    }

    /// Recent filings of `form_types` for a company, newest first.
    pub async fn find_filings(
        &self,
        cik: &str,
        form_types: &[String],
        limit: usize,
    ) -> Result<(CompanySubmission, Vec<FilingInfo>), EdgarError> {
        let cik = normalize_cik(cik)?;
        let submission = self.get_company_submissions(&cik).await?;
        let filings = submission.recent_filings(&cik, form_types, limit)?;
        tracing::info!(
            "Found {} filings for {} (CIK {})",
            filings.len(),
            submission.name,
            cik
        );
        Ok((submission, filings))
    }

    /// Downloads a specific filing document from its URL.
    pub async fn download_filing_doc(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);
        let response = self.get(url).await?;

        let body = response.text().await?; // Propagates reqwest::Error as EdgarError::Network
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn check_status(status: reqwest::StatusCode, url: &str) -> Result<(), EdgarError> {
    if status.is_success() {
        return Ok(());
    }

    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    if status == reqwest::StatusCode::FORBIDDEN {
        tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
        return Err(EdgarError::RateLimited);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(EdgarError::FilingDocNotFound(url.to_string()));
    }
    Err(EdgarError::Http(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping() {
        let url = "https://www.sec.gov/x";
        assert!(check_status(StatusCode::OK, url).is_ok());
        assert!(matches!(check_status(StatusCode::FORBIDDEN, url), Err(EdgarError::RateLimited)));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, url),
            Err(EdgarError::FilingDocNotFound(u)) if u == url
        ));
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR, url),
            Err(EdgarError::Http(StatusCode::INTERNAL_SERVER_ERROR))
        ));
    }

    #[test]
    fn invalid_cik_fails_before_any_request() {
        let client = EdgarClient::new("Test test@example.com", Duration::ZERO).unwrap();
        let result = tokio_test::block_on(client.get_company_submissions("not-a-cik"));
        assert!(matches!(result, Err(EdgarError::InvalidCik(_))));
    }
}
