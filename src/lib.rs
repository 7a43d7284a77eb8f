//! Outreach Hub - analytics back end for LinkedIn outreach
//!
//! This library loads chat history and outreach leads from a spreadsheet
//! backend (or a local JSON export), reconciles the chat history into
//! per-counterparty conversation threads, computes dashboard statistics and
//! triggers the external lead-search webhook.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod identity;
pub mod model;
pub mod notifier;
pub mod reconcile;
pub mod session;
pub mod source;
pub mod timestamp;

pub use identity::{is_me, Identity};
pub use model::{ConversationThread, LeadRecord, MessageRecord, Row};
pub use reconcile::{get_contact_info, ContactMap, ConversationStats, LastContactPolicy};

/// Result type alias for Outreach Hub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Outreach Hub operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tabular data source error (fetch failed, bad response shape)
    #[error("Source error: {0}")]
    Source(String),

    /// Outbound webhook error (raised only for invalid requests; delivery
    /// failures are reported through `NotifyOutcome`)
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Session state persistence error
    #[error("Session error: {0}")]
    Session(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Initialize the Outreach Hub library with logging
pub fn init() {
    tracing_subscriber::fmt::init();
}

#[cfg(test)]
mod tests;
