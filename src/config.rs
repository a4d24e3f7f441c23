//! Subsystem configuration: provider endpoint, model, timing budgets.

use std::env;
use std::time::Duration;

/// OpenAI-compatible provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default extraction model. Vision-capable, cheap enough for per-receipt use.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Hard wall-clock budget for a single provider call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Retry budget for one extraction attempt. Worst-case latency is roughly
/// timeout x attempts under retryable failures.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// First backoff delay; doubles on every subsequent attempt.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Receipts are logged in Polish zloty.
pub const CURRENCY: &str = "PLN";

/// Log filter applied when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "paragon=info"
}

/// Runtime configuration for the AI subsystem.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Endpoint of the deployed extraction function, when receipt processing
    /// is delegated to it instead of calling the provider directly.
    pub extraction_url: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            extraction_url: None,
        }
    }
}

impl AiConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("PARAGON_AI_BASE_URL") {
            config.base_url = url;
        }
        config.api_key = env::var("PARAGON_AI_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok();
        if let Ok(model) = env::var("PARAGON_AI_MODEL") {
            config.model = model;
        }
        if let Some(secs) = env::var("PARAGON_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(url) = env::var("PARAGON_EXTRACTION_URL") {
            config.extraction_url = Some(url);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_operating_budgets() {
        let config = AiConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay, Duration::from_millis(1000));
        assert!(config.api_key.is_none());
        assert!(config.extraction_url.is_none());
    }

    #[test]
    fn currency_is_pln() {
        assert_eq!(CURRENCY, "PLN");
    }
}
