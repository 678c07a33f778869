// src/edgar/mod.rs
pub mod client;
pub mod header;
pub mod models;

pub use client::EdgarClient;
pub use header::read_sec_header;
pub use models::{CompanySubmission, FilingInfo};
