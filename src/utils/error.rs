// src/utils/error.rs
use thiserror::Error;

/// Failures talking to EDGAR. Only the fetch path produces these.
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("SEC Rate limit likely exceeded")]
    RateLimited,

    #[error("Invalid CIK: {0}")]
    InvalidCik(String),

    #[error("Could not find specified filing: {0}")]
    FilingDocNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

/// Raised at the parser boundary. A filing that fails here is skipped by the
/// caller; it is never turned into an empty "no signals" result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No parser accepts form type {form_type} (filing {accession_number})")]
    UnsupportedForm {
        form_type: String,
        accession_number: String,
    },

    #[error("Failed to parse {form_type} filing {accession_number}: missing {field}")]
    MissingMetadata {
        form_type: String,
        accession_number: String,
        field: &'static str,
    },
}

/// Raised inside the extractor; the extractor boundary logs it and yields no
/// events for the filing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid filing date '{date}' on filing {accession_number}")]
    InvalidFilingDate {
        accession_number: String,
        date: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError),

    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
