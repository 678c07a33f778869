// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::events::{Event, EventStatus};
use crate::parsers::model::FilingMetadata;
use crate::utils::error::StorageError;

const EVENTS_DIR: &str = "events";
const FILINGS_DIR: &str = "filings";

/// JSON-file event store: one `events/{id}.json` per event plus the raw
/// filings under `filings/`.
pub struct EventStore {
    events_dir: PathBuf,
    filings_dir: PathBuf,
}

impl EventStore {
    /// Creates a new EventStore with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref();
        let events_dir = base_path.join(EVENTS_DIR);
        let filings_dir = base_path.join(FILINGS_DIR);

        for dir in [&events_dir, &filings_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self {
            events_dir,
            filings_dir,
        })
    }

    /// Saves the raw filing text as `filings/{accession}.txt`.
    pub fn save_raw_filing(&self, metadata: &FilingMetadata, content: &str) -> Result<PathBuf, StorageError> {
        let file_path = self
            .filings_dir
            .join(format!("{}.txt", file_stem(&metadata.accession_number)));
        fs::write(&file_path, content).map_err(StorageError::IoError)?;

        tracing::info!("Saved raw filing to {}", file_path.display());
        Ok(file_path)
    }

    /// Upserts events by id. A stored ticker survives when the incoming event
    /// has none. Returns the number of events written.
    pub fn save_events(&self, events: &[Event]) -> Result<usize, StorageError> {
        let mut written = 0;
        for event in events {
            let path = self.event_path(&event.id);
            let mut event = event.clone();

            if event.ticker.is_none() && path.exists() {
                event.ticker = read_event(&path)?.ticker;
            }

            write_event(&path, &event)?;
            tracing::debug!("Saved event {}", event.id);
            written += 1;
        }

        tracing::info!("Saved {} events to {}", written, self.events_dir.display());
        Ok(written)
    }

    /// All stored events, sorted by id.
    pub fn load_events(&self) -> Result<Vec<Event>, StorageError> {
        let mut events = Vec::new();
        for entry in fs::read_dir(&self.events_dir).map_err(StorageError::IoError)? {
            let path = entry.map_err(StorageError::IoError)?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                events.push(read_event(&path)?);
            }
        }
        events.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(events)
    }

    /// Marks pending events whose execution date is before `today` as
    /// completed. Returns how many changed.
    pub fn update_statuses(&self, today: NaiveDate) -> Result<usize, StorageError> {
        let mut updated = 0;
        for mut event in self.load_events()? {
            let due = event.execution_date.map_or(false, |date| date < today);
            if event.status == EventStatus::Pending && due {
                event.status = EventStatus::Completed;
                write_event(&self.event_path(&event.id), &event)?;
                tracing::info!("Marked event {} as completed", event.id);
                updated += 1;
            }
        }

        tracing::info!("Updated status of {} events", updated);
        Ok(updated)
    }

    fn event_path(&self, id: &str) -> PathBuf {
        self.events_dir.join(format!("{}.json", file_stem(id)))
    }
}

// Ids and accession numbers are plain ASCII; anything path-like is replaced.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

fn read_event(path: &Path) -> Result<Event, StorageError> {
    let raw = fs::read_to_string(path).map_err(StorageError::IoError)?;
    serde_json::from_str(&raw).map_err(|e| {
        StorageError::SerializationError(format!("{}: {}", path.display(), e))
    })
}

fn write_event(path: &Path, event: &Event) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(event)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, json).map_err(StorageError::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::model::{EventDetails, ShareBuybackDetails, SpinOffDetails};

    fn metadata(accession_number: &str) -> FilingMetadata {
        FilingMetadata {
            accession_number: accession_number.to_string(),
            cik: "123".to_string(),
            company_name: "Acme".to_string(),
            filing_date: "2024-01-05".to_string(),
            form_type: "8-K".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn buyback(accession_number: &str) -> Event {
        Event::new(
            &metadata(accession_number),
            date(2024, 1, 5),
            EventDetails::ShareBuyback(ShareBuybackDetails {
                amount: Some(10_000_000.0),
                shares: None,
                program_details: None,
            }),
        )
    }

    fn spin_off(accession_number: &str, distribution: Option<NaiveDate>) -> Event {
        Event::new(
            &metadata(accession_number),
            date(2024, 1, 5),
            EventDetails::SpinOff(SpinOffDetails {
                unit_name: Some("Consumer Health".to_string()),
                record_date: None,
                distribution_date: distribution.map(|d| d.to_string()),
            }),
        )
        .with_execution_date(distribution)
    }

    #[test]
    fn creates_layout_and_saves_raw_filing() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::new(dir.path().join("out")).unwrap();
        assert!(dir.path().join("out/events").is_dir());

        let path = store.save_raw_filing(&metadata("0001-23"), "raw text").unwrap();
        assert_eq!(path, dir.path().join("out/filings/0001-23.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "raw text");
    }

    #[test]
    fn save_is_an_upsert_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::new(dir.path()).unwrap();

        assert_eq!(store.save_events(&[buyback("0001-23"), buyback("0001-24")]).unwrap(), 2);
        assert_eq!(store.save_events(&[buyback("0001-23")]).unwrap(), 1);

        let events = store.load_events().unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["shareBuyback-123-0001-23", "shareBuyback-123-0001-24"]);
        assert_eq!(events[0], buyback("0001-23"));
    }

    #[test]
    fn stored_ticker_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::new(dir.path()).unwrap();

        let mut enriched = buyback("0001-23");
        enriched.ticker = Some("ACME".to_string());
        store.save_events(&[enriched]).unwrap();
        store.save_events(&[buyback("0001-23")]).unwrap();

        let events = store.load_events().unwrap();
        assert_eq!(events[0].ticker.as_deref(), Some("ACME"));
    }

    #[test]
    fn past_pending_events_complete() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::new(dir.path()).unwrap();
        store
            .save_events(&[
                spin_off("0001-01", Some(date(2024, 3, 1))),
                spin_off("0001-02", Some(date(2024, 6, 1))),
                spin_off("0001-03", None),
            ])
            .unwrap();

        assert_eq!(store.update_statuses(date(2024, 6, 1)).unwrap(), 1);
        let statuses: Vec<EventStatus> = store.load_events().unwrap().iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![EventStatus::Completed, EventStatus::Pending, EventStatus::Pending]
        );
        // Nothing left to do on a second run.
        assert_eq!(store.update_statuses(date(2024, 6, 1)).unwrap(), 0);
    }

    #[test]
    fn corrupt_event_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("events/broken.json"), "{not json").unwrap();
        assert!(matches!(store.load_events(), Err(StorageError::SerializationError(_))));
    }
}
