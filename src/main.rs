// src/main.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use sec_events::config::{self, AppConfig};
use sec_events::edgar::{read_sec_header, EdgarClient};
use sec_events::utils::logging::setup_logging;
use sec_events::{AppError, BatchOutcome, Event, EventStore, FilingMetadata, FilingPipeline, RawFiling};

const FILING_EXTENSIONS: &[&str] = &["txt", "htm", "html", "xml"];

/// Command Line Interface for SEC filing event extraction
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory for stored events and raw filings
    #[arg(short, long, global = true, default_value = config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// User-Agent sent to EDGAR (defaults to $SEC_API_EMAIL)
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Delay before each EDGAR request, in milliseconds
    #[arg(long, global = true, default_value_t = config::DEFAULT_REQUEST_DELAY_MS)]
    request_delay_ms: u64,

    /// Filings processed concurrently
    #[arg(long, global = true, default_value_t = sec_events::pipeline::DEFAULT_BATCH_CONCURRENCY)]
    concurrency: usize,

    /// Parse HTML filings as-is instead of flattening them to text
    #[arg(long, global = true)]
    no_html_normalize: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract events from local filing files or directories
    Process {
        /// Filing files, or directories of .txt/.htm/.html/.xml files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },
    /// Download a company's recent filings from EDGAR and extract events
    Fetch {
        /// Central Index Key, padded or not
        #[arg(long)]
        cik: String,

        /// Form types to fetch (defaults to every form with a parser)
        #[arg(long = "form-type")]
        form_types: Vec<String>,

        /// Maximum number of filings
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Complete pending events whose execution date has passed
    UpdateStatuses {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// Metadata overrides for `process`; anything unset comes from the SEC header.
#[derive(Args, Debug, Default, Clone)]
struct MetadataArgs {
    #[arg(long)]
    form_type: Option<String>,
    #[arg(long)]
    accession_number: Option<String>,
    #[arg(long)]
    cik: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    filing_date: Option<String>,
}

impl MetadataArgs {
    /// Header values overlaid with flags. The accession number falls back to
    /// the file stem, matching how raw filings are stored.
    fn resolve(&self, header: Option<FilingMetadata>, path: &Path) -> Option<FilingMetadata> {
        let header = header.unwrap_or_else(|| FilingMetadata {
            accession_number: String::new(),
            cik: String::new(),
            company_name: String::new(),
            filing_date: String::new(),
            form_type: String::new(),
        });
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let pick = |flag: &Option<String>, from_header: String| flag.clone().unwrap_or(from_header);
        let mut metadata = FilingMetadata {
            accession_number: pick(&self.accession_number, header.accession_number),
            cik: pick(&self.cik, header.cik),
            company_name: pick(&self.company_name, header.company_name),
            filing_date: pick(&self.filing_date, header.filing_date),
            form_type: pick(&self.form_type, header.form_type),
        };
        if metadata.accession_number.is_empty() {
            metadata.accession_number = stem;
        }

        if metadata.form_type.is_empty() {
            None
        } else {
            Some(metadata)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    setup_logging();

    // 2. Parse CLI Arguments
    let cli = Cli::parse();
    tracing::debug!("Starting with args: {:?}", cli);

    let config = AppConfig {
        output_dir: cli.output_dir.clone(),
        user_agent: cli.user_agent.clone(),
        request_delay: Duration::from_millis(cli.request_delay_ms),
        batch_concurrency: cli.concurrency,
        normalize_html: !cli.no_html_normalize,
    };

    let store = EventStore::new(&config.output_dir)?;

    match cli.command {
        Command::Process { paths, metadata } => process_files(&config, &store, &paths, &metadata).await,
        Command::Fetch {
            cik,
            form_types,
            limit,
        } => fetch(&config, &store, &cik, form_types, limit).await,
        Command::UpdateStatuses { today } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let updated = store.update_statuses(today)?;
            tracing::info!("Marked {} events as completed (as of {})", updated, today);
            Ok(())
        }
    }
}

async fn process_files(
    config: &AppConfig,
    store: &EventStore,
    paths: &[PathBuf],
    overrides: &MetadataArgs,
) -> Result<(), AppError> {
    let mut filings = Vec::new();
    for path in collect_filing_paths(paths)? {
        let content = std::fs::read_to_string(&path)?;
        match overrides.resolve(read_sec_header(&content), &path) {
            Some(metadata) => filings.push(RawFiling { content, metadata }),
            None => tracing::warn!(
                "Skipping {}: no form type in SEC header or --form-type",
                path.display()
            ),
        }
    }

    if filings.is_empty() {
        return Err(AppError::Config("No processable filings found".to_string()));
    }

    let pipeline = FilingPipeline::from_config(config);
    let events = finish_batch(store, pipeline.process_batch(filings).await, None)?;

    let json = serde_json::to_string_pretty(&events)
        .map_err(|e| AppError::Processing(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

async fn fetch(
    config: &AppConfig,
    store: &EventStore,
    cik: &str,
    form_types: Vec<String>,
    limit: usize,
) -> Result<(), AppError> {
    let pipeline = FilingPipeline::from_config(config);
    let form_types = if form_types.is_empty() {
        pipeline.factory().supported_forms().into_iter().map(str::to_string).collect()
    } else {
        form_types
    };

    let client = EdgarClient::new(&config.resolve_user_agent()?, config.request_delay)?;
    let (submission, listed) = client.find_filings(cik, &form_types, limit).await?;

    if listed.is_empty() {
        return Err(AppError::Config(format!(
            "No {} filings found for CIK {}",
            form_types.join("/"),
            cik
        )));
    }

    let mut filings = Vec::new();
    for filing in listed {
        let url = filing.full_text_url();
        match client.download_filing_doc(&url).await {
            Ok(content) => {
                let metadata = filing.to_metadata();
                if let Err(e) = store.save_raw_filing(&metadata, &content) {
                    tracing::error!("Failed to save raw filing {}: {}", metadata.accession_number, e);
                }
                filings.push(RawFiling { content, metadata });
            }
            Err(e) => tracing::error!("Failed to download filing document {}: {}", url, e),
        }
    }

    let outcomes = pipeline.process_batch(filings).await;
    finish_batch(store, outcomes, submission.ticker())?;
    Ok(())
}

/// Logs per-filing outcomes, applies the ticker and stores the events.
fn finish_batch(
    store: &EventStore,
    outcomes: Vec<BatchOutcome>,
    ticker: Option<&str>,
) -> Result<Vec<Event>, AppError> {
    let mut events = Vec::new();
    let mut failure_count = 0;
    let total = outcomes.len();

    for outcome in outcomes {
        match outcome {
            BatchOutcome::Extracted {
                accession_number,
                events: found,
            } => {
                tracing::info!("Filing {}: {} events", accession_number, found.len());
                events.extend(found);
            }
            BatchOutcome::Skipped {
                accession_number,
                form_type,
            } => tracing::info!("Filing {} skipped (form {})", accession_number, form_type),
            BatchOutcome::Failed {
                accession_number,
                error,
            } => {
                tracing::error!("Filing {} failed: {}", accession_number, error);
                failure_count += 1;
            }
        }
    }

    if let Some(ticker) = ticker {
        for event in events.iter_mut().filter(|e| e.ticker.is_none()) {
            event.ticker = Some(ticker.to_string());
        }
    }

    store.save_events(&events)?;
    tracing::info!(
        "Processing finished. Filings: {}, Failures: {}, Events: {}",
        total,
        failure_count,
        events.len()
    );

    if total > 0 && failure_count == total {
        return Err(AppError::Processing(format!(
            "Failed to process any of {} filings",
            failure_count
        )));
    }
    Ok(events)
}

/// Expands directories (one level) into their filing files.
fn collect_filing_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_filing_extension(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn has_filing_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| FILING_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
