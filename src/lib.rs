// src/lib.rs
pub mod config;
pub mod edgar;
pub mod events;
pub mod parsers;
pub mod pipeline;
pub mod storage;
pub mod utils;

pub use config::AppConfig;
pub use events::{Event, EventDetails, EventExtractor, EventStatus, EventType};
pub use parsers::{FilingMetadata, FilingParser, ParsedData, ParsedFiling, ParserFactory};
pub use pipeline::{BatchOutcome, FilingPipeline, RawFiling};
pub use storage::EventStore;
pub use utils::AppError;
