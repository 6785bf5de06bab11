pub mod env;
mod loader;

pub use env::{
    AppConfig, AppViewConfig, ConfigError, DirectoryConfig, LoggingConfig, ModerationConfig,
    TriageRunConfig,
};
pub use loader::load_config;
