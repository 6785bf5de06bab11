use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub moderation: ModerationConfig,
    pub appview: AppViewConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub triage: TriageRunConfig,
}

#[derive(Debug, Clone)]
pub struct ModerationConfig {
    pub base_url: String,
    pub auth_token: String,
}

#[derive(Debug, Clone)]
pub struct AppViewConfig {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct TriageRunConfig {
    /// When set, re-run the triage pass on this interval until shutdown;
    /// when unset, run once and exit.
    pub interval: Option<Duration>,
    pub page_size: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
