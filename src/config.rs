// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::DEFAULT_BATCH_CONCURRENCY;
use crate::utils::error::AppError;

/// Environment variable holding the contact address sent as the SEC User-Agent.
pub const USER_AGENT_ENV: &str = "SEC_API_EMAIL";

// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 150;

pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Runtime settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    /// Explicit User-Agent; falls back to `SEC_API_EMAIL` when unset.
    pub user_agent: Option<String>,
    pub request_delay: Duration,
    pub batch_concurrency: usize,
    pub normalize_html: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: None,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            normalize_html: true,
        }
    }
}

impl AppConfig {
    /// The User-Agent for EDGAR requests. The SEC rejects anonymous clients,
    /// so a missing value is a configuration error.
    pub fn resolve_user_agent(&self) -> Result<String, AppError> {
        let from_env = std::env::var(USER_AGENT_ENV).ok();
        self.user_agent_from(from_env)
    }

    fn user_agent_from(&self, from_env: Option<String>) -> Result<String, AppError> {
        self.user_agent
            .clone()
            .or(from_env)
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "EDGAR requires a User-Agent: pass --user-agent or set {}",
                    USER_AGENT_ENV
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let config = AppConfig {
            user_agent: Some("Research Desk desk@example.com".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.user_agent_from(Some("env@example.com".to_string())).unwrap(),
            "Research Desk desk@example.com"
        );
    }

    #[test]
    fn environment_is_the_fallback() {
        let config = AppConfig::default();
        assert_eq!(
            config.user_agent_from(Some(" env@example.com ".to_string())).unwrap(),
            "env@example.com"
        );
        assert!(matches!(config.user_agent_from(None), Err(AppError::Config(_))));
        assert!(matches!(
            config.user_agent_from(Some("   ".to_string())),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.request_delay, Duration::from_millis(150));
        assert_eq!(config.batch_concurrency, 4);
        assert!(config.normalize_html);
    }
}
