use tracing::warn;

use crate::services::price_service::OverlapPolicy;

const DEFAULT_REGISTER_URL: &str = "https://staging.hellogold.com/api/v3/users/register.json";
const DEFAULT_SPOT_PRICE_URL: &str = "https://cws.hellogold.com/api/v2/spot_price.json";
const DEFAULT_YESTERDAY_LABEL: &str = "Yesterday";
const DEFAULT_PAGE_SIZE: usize = 10;

/// Runtime settings, read from the environment (and `.env` via dotenv)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub register_url: String,
    pub spot_price_url: String,
    pub overlap_policy: OverlapPolicy,
    pub yesterday_label: String,
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            register_url: DEFAULT_REGISTER_URL.to_string(),
            spot_price_url: DEFAULT_SPOT_PRICE_URL.to_string(),
            overlap_policy: OverlapPolicy::AllowDuplicates,
            yesterday_label: DEFAULT_YESTERDAY_LABEL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load from process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("HELLOGOLD_REGISTER_URL").filter(|v| !v.trim().is_empty()) {
            config.register_url = url.trim().to_string();
        }

        if let Some(url) = lookup("HELLOGOLD_SPOT_PRICE_URL").filter(|v| !v.trim().is_empty()) {
            config.spot_price_url = url.trim().to_string();
        }

        if let Some(raw) = lookup("HELLOGOLD_OVERLAP_POLICY") {
            match raw.parse::<OverlapPolicy>() {
                Ok(policy) => config.overlap_policy = policy,
                Err(e) => warn!("Ignoring HELLOGOLD_OVERLAP_POLICY: {}", e),
            }
        }

        if let Some(label) = lookup("HELLOGOLD_YESTERDAY_LABEL").filter(|v| !v.trim().is_empty()) {
            config.yesterday_label = label.trim().to_string();
        }

        if let Some(raw) = lookup("HELLOGOLD_PAGE_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.page_size = size,
                _ => warn!("Ignoring HELLOGOLD_PAGE_SIZE '{}': expected a positive integer", raw),
            }
        }

        config
    }
}
