// src/events/mod.rs
pub mod extractor;
pub mod fields;
pub mod model;

pub use extractor::EventExtractor;
pub use model::{Event, EventDetails, EventStatus, EventType};
