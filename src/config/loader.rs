use std::env;
use std::time::Duration;

use url::Url;

use super::env::{
    AppConfig, AppViewConfig, ConfigError, DirectoryConfig, LoggingConfig, ModerationConfig,
    TriageRunConfig,
};

const DEFAULT_APPVIEW_URL: &str = "https://public.api.bsky.app";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let moderation = ModerationConfig {
            base_url: base_url("BFF_API_URL", None)?,
            auth_token: env::var("BFF_AUTH_TOKEN")
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("BFF_AUTH_TOKEN"))?,
        };

        let appview = AppViewConfig {
            base_url: base_url("BSKY_APPVIEW_URL", Some(DEFAULT_APPVIEW_URL))?,
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let triage = TriageRunConfig {
            interval: env::var("TRIAGE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            page_size: env::var("TRIAGE_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(100),
        };

        Ok(Self {
            moderation,
            appview,
            directories,
            logging,
            triage,
        })
    }
}

// Trailing slash is stripped so endpoint paths can be appended uniformly.
fn base_url(key: &'static str, default: Option<&str>) -> Result<String, ConfigError> {
    let raw = match env::var(key).ok().filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => default.ok_or(ConfigError::Missing(key))?.to_string(),
    };

    let parsed = Url::parse(&raw).map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}
