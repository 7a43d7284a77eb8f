//! Per-session bookkeeping
//!
//! Everything the dashboard remembers between renders lives in one explicit
//! `SessionState` value: the activity log, sent/selected/favorite leads, notes,
//! tags and the history of accepted searches. The state can be persisted to a
//! JSON file so a CLI session can pick up where the last one stopped.

use crate::{
    analytics::STATUS_SENT,
    model::LeadRecord,
    notifier::{NotifyOutcome, SearchRequest},
    Error, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Key identifying a lead: its profile URL, else `row:<index>`
pub type LeadKey = String;

/// Activity kind for search requests
pub const ACTIVITY_SEARCH: &str = "Search";

/// Activity kind for bulk send actions
pub const ACTIVITY_BULK_SEND: &str = "Bulk Send";

/// Activity kind for a message sent to one lead
pub const ACTIVITY_MESSAGE_SENT: &str = "Message Sent";

/// One entry of the activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Kind of action, e.g. "Search"
    pub kind: String,
    /// What the action touched
    pub details: String,
    /// Outcome label
    pub status: String,
    /// When it happened
    pub time: DateTime<Utc>,
}

/// One accepted search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    /// `"<search term> - <city>"`
    pub search: String,
    /// Outcome label
    pub status: String,
    /// When the search was accepted
    pub time: DateTime<Utc>,
    /// Number of leads requested
    pub leads: u32,
}

/// Summary of searches made this session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchStats {
    /// Searches attempted
    pub total: usize,
    /// Searches the webhook accepted
    pub successful: usize,
    /// `successful / total` as a percentage, 0 when nothing was attempted
    pub success_rate: f64,
}

/// Session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Every action taken, oldest first
    pub activity_log: Vec<ActivityEntry>,
    /// Leads marked as sent
    pub sent_leads: HashSet<LeadKey>,
    /// Leads selected for a bulk action, in selection order
    pub selected_leads: Vec<LeadKey>,
    /// Starred leads
    pub favorites: HashSet<LeadKey>,
    /// Free-text notes per lead
    pub notes: HashMap<LeadKey, String>,
    /// Normalized tags per lead
    pub tags: HashMap<LeadKey, BTreeSet<String>>,
    /// Accepted searches, oldest first
    pub webhook_history: Vec<SearchHistoryEntry>,
    /// Last time the data was refreshed
    pub last_refresh: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create an empty session
    pub fn new() -> Self {
        Self {
            activity_log: Vec::new(),
            sent_leads: HashSet::new(),
            selected_leads: Vec::new(),
            favorites: HashSet::new(),
            notes: HashMap::new(),
            tags: HashMap::new(),
            webhook_history: Vec::new(),
            last_refresh: Utc::now(),
        }
    }

    /// Append an entry to the activity log
    pub fn log_activity(
        &mut self,
        kind: impl Into<String>,
        details: impl Into<String>,
        status: impl Into<String>,
    ) {
        self.activity_log.push(ActivityEntry {
            kind: kind.into(),
            details: details.into(),
            status: status.into(),
            time: Utc::now(),
        });
    }

    /// The `n` most recent activity entries, newest first
    pub fn recent_activity(&self, n: usize) -> Vec<&ActivityEntry> {
        self.activity_log.iter().rev().take(n).collect()
    }

    /// Mark a lead as sent
    pub fn mark_sent(&mut self, key: &str) {
        self.sent_leads.insert(key.to_string());
    }

    /// Whether a lead was marked as sent
    pub fn is_sent(&self, key: &str) -> bool {
        self.sent_leads.contains(key)
    }

    /// Whether a lead counts as sent: its status says so or it was marked here
    pub fn is_lead_sent(&self, lead: &LeadRecord) -> bool {
        lead.status == STATUS_SENT || self.is_sent(&lead.key())
    }

    /// Mark one lead as sent and log it
    ///
    /// Returns false, logging nothing, when the lead already counts as sent.
    pub fn send_to(&mut self, lead: &LeadRecord) -> bool {
        if self.is_lead_sent(lead) {
            return false;
        }
        self.mark_sent(&lead.key());
        self.log_activity(
            ACTIVITY_MESSAGE_SENT,
            format!("To {}", lead.display_name()),
            "Sent",
        );
        true
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self, key: &str) -> bool {
        if self.favorites.remove(key) {
            false
        } else {
            self.favorites.insert(key.to_string());
            true
        }
    }

    /// Whether a lead is starred
    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.contains(key)
    }

    /// Set the note for a lead; blank text removes it
    pub fn set_note(&mut self, key: &str, text: &str) {
        if text.trim().is_empty() {
            self.notes.remove(key);
        } else {
            self.notes.insert(key.to_string(), text.to_string());
        }
    }

    /// The note for a lead
    pub fn note(&self, key: &str) -> Option<&str> {
        self.notes.get(key).map(String::as_str)
    }

    /// Add a tag (trimmed, lower-cased); returns false for blank or duplicate tags
    pub fn add_tag(&mut self, key: &str, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return false;
        }
        self.tags.entry(key.to_string()).or_default().insert(tag)
    }

    /// Remove a tag; returns true if it was present
    pub fn remove_tag(&mut self, key: &str, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        let Some(tags) = self.tags.get_mut(key) else {
            return false;
        };
        let removed = tags.remove(&tag);
        if tags.is_empty() {
            self.tags.remove(key);
        }
        removed
    }

    /// Tags of a lead in sorted order
    pub fn tags(&self, key: &str) -> Vec<&str> {
        self.tags
            .get(key)
            .map(|tags| tags.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Add a lead to the selection (no duplicates)
    pub fn select_lead(&mut self, key: &str) {
        if !self.selected_leads.iter().any(|k| k == key) {
            self.selected_leads.push(key.to_string());
        }
    }

    /// Remove a lead from the selection; returns true if it was selected
    pub fn deselect_lead(&mut self, key: &str) -> bool {
        let before = self.selected_leads.len();
        self.selected_leads.retain(|k| k != key);
        self.selected_leads.len() != before
    }

    /// Whether a lead is selected
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected_leads.iter().any(|k| k == key)
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selected_leads.clear();
    }

    /// Record the outcome of a search request
    ///
    /// Every attempt lands in the activity log; only accepted searches are
    /// added to the webhook history.
    pub fn record_search(&mut self, request: &SearchRequest, outcome: &NotifyOutcome) {
        let status = outcome.status_label();
        self.log_activity(ACTIVITY_SEARCH, request.summary(), status.clone());

        if outcome.success {
            self.webhook_history.push(SearchHistoryEntry {
                search: format!("{} - {}", request.search_term, request.city),
                status,
                time: Utc::now(),
                leads: request.num_leads,
            });
        }
    }

    /// The `n` most recent accepted searches, newest first
    pub fn recent_searches(&self, n: usize) -> Vec<&SearchHistoryEntry> {
        self.webhook_history.iter().rev().take(n).collect()
    }

    /// Attempted vs accepted searches this session
    pub fn search_stats(&self) -> SearchStats {
        let total = self
            .activity_log
            .iter()
            .filter(|entry| entry.kind == ACTIVITY_SEARCH)
            .count();
        let successful = self.webhook_history.len();
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64 * 100.0
        };

        SearchStats {
            total,
            successful,
            success_rate,
        }
    }

    /// Mark the first `count` leads as sent, logging one activity per lead
    ///
    /// Returns the number of leads marked.
    pub fn bulk_mark_sent(&mut self, leads: &[LeadRecord], count: usize) -> usize {
        let batch = &leads[..count.min(leads.len())];
        for lead in batch {
            self.mark_sent(&lead.key());
            self.log_activity(ACTIVITY_BULK_SEND, lead.display_name(), "Sent");
        }
        debug!("Bulk-marked {} leads as sent", batch.len());
        batch.len()
    }

    /// Record that the data was just refreshed
    pub fn touch_refresh(&mut self) {
        self.last_refresh = Utc::now();
    }

    /// Save the session to a JSON file
    ///
    /// # Errors
    /// Returns an error if serialization or file operations fail
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Session(format!("Failed to create session directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::Session(format!("Failed to write session file: {}", e)))?;
        Ok(())
    }

    /// Load a session from a JSON file
    ///
    /// A missing or empty file yields a fresh session.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Session(format!("Failed to read session file: {}", e)))?;
        if json.trim().is_empty() {
            return Ok(Self::new());
        }

        let state: SessionState = serde_json::from_str(&json)?;
        Ok(state)
    }
}
