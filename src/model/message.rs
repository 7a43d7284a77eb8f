//! Chat history records

use crate::{
    identity::{is_me, Identity},
    model::row::{field, field_any, text_field, Row},
};
use serde::{Deserialize, Serialize};

/// One row of conversation history
///
/// Every field defaults to `""` when the source column is missing or null.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Display name of whoever authored the message
    pub sender_name: String,
    /// Profile URL of whoever authored the message
    pub sender_url: String,
    /// Counterparty name when the message was authored by me
    pub lead_name: String,
    /// Counterparty profile URL when the message was authored by me
    pub lead_url: String,
    /// Free-text body
    pub message: String,
    /// Date the message was sent (sheet format, e.g. "2024-01-01")
    pub date: String,
    /// Time the message was sent (sheet format, e.g. "09:05")
    pub time: String,
    /// Combined timestamp, used by exports that lack separate date/time columns
    pub timestamp: String,
    /// Attachment descriptor, if any
    pub shared_content: String,
}

impl MessageRecord {
    /// Build a record from a raw row, defaulting every missing column
    ///
    /// A non-text `sender_name` cell reads as `""`, so such a row is never
    /// treated as authored by me.
    pub fn from_row(row: &Row) -> Self {
        Self {
            sender_name: text_field(row, "sender_name"),
            sender_url: field_any(row, &["sender_linkedin_url", "sender_url"]),
            lead_name: field(row, "lead_name"),
            lead_url: field_any(row, &["lead_linkedin_url", "lead_url"]),
            message: field(row, "message"),
            date: field(row, "date"),
            time: field(row, "time"),
            timestamp: field(row, "timestamp"),
            shared_content: field(row, "shared_content"),
        }
    }

    /// Convert a batch of rows, preserving order
    pub fn from_rows(rows: &[Row]) -> Vec<Self> {
        rows.iter().map(Self::from_row).collect()
    }

    /// Whether this message was authored by `identity`
    pub fn is_from(&self, identity: &Identity) -> bool {
        is_me(&self.sender_name, Some(&self.sender_url), identity)
    }

    /// The "last contact" string for this row
    ///
    /// Plain `"{date} {time}"` concatenation. Exports without date/time
    /// columns fall back to the `timestamp` column.
    pub fn contact_time(&self) -> String {
        if self.date.is_empty() && self.time.is_empty() && !self.timestamp.is_empty() {
            return self.timestamp.clone();
        }
        format!("{} {}", self.date, self.time)
    }

    /// Case-insensitive substring search across all text fields
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        [
            &self.sender_name,
            &self.sender_url,
            &self.lead_name,
            &self.lead_url,
            &self.message,
            &self.date,
            &self.time,
            &self.timestamp,
            &self.shared_content,
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
    }
}

impl From<&Row> for MessageRecord {
    fn from(row: &Row) -> Self {
        Self::from_row(row)
    }
}
