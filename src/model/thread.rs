//! Per-counterparty conversation threads

use crate::{identity::initials, model::message::MessageRecord};
use serde::{Deserialize, Serialize};

/// Aggregated view of every message exchanged with one counterparty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationThread {
    /// Counterparty display name
    pub name: String,
    /// Counterparty profile URL (the thread key)
    pub url: String,
    /// Messages in source row order
    pub messages: Vec<MessageRecord>,
    /// Messages authored by me
    pub sent_count: usize,
    /// Messages authored by the counterparty
    pub received_count: usize,
    /// Date and time of the last contact, see `LastContactPolicy`
    pub last_contact: Option<String>,
}

impl ConversationThread {
    /// Create an empty thread for a counterparty
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            messages: Vec::new(),
            sent_count: 0,
            received_count: 0,
            last_contact: None,
        }
    }

    /// Append a message authored by me
    pub fn push_sent(&mut self, msg: MessageRecord) {
        self.sent_count += 1;
        self.messages.push(msg);
    }

    /// Append a message authored by the counterparty
    pub fn push_received(&mut self, msg: MessageRecord) {
        self.received_count += 1;
        self.messages.push(msg);
    }

    /// Total number of messages
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Messages ordered by `(date, time)`
    ///
    /// Keys are compared as strings, matching how the sheet values sort.
    /// The sort is stable, so rows sharing a key keep source order.
    pub fn sorted_messages(&self) -> Vec<&MessageRecord> {
        let mut sorted: Vec<&MessageRecord> = self.messages.iter().collect();
        sorted.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
        sorted
    }

    /// Initials of the counterparty name
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}
