pub mod app;
pub mod bsky;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod moderation;
pub mod triage;
