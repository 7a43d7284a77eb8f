//! Conversation reconciliation
//!
//! Groups a flat, ordered message log into per-counterparty conversation
//! threads and classifies each message as sent or received.
//!
//! The reconciler runs in two passes over one materialized slice:
//! 1. **Seed** - every row not authored by me registers its counterparty
//!    (sender URL, else lead URL) as a thread key.
//! 2. **Accumulate** - every row is appended to the thread it belongs to.
//!    Rows authored by me go to the lead URL's thread and count as sent;
//!    other rows go to the sender (else lead) URL's thread and count as received.
//!
//! Rows authored by me never create a thread on their own. A self-authored row
//! whose lead URL is empty, or whose lead never wrote back, is dropped.

use crate::{
    identity::Identity,
    model::{ConversationThread, MessageRecord},
    timestamp::parse_timestamp,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How `ConversationThread::last_contact` is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastContactPolicy {
    /// The `"{date} {time}"` string of the last row appended, in source order
    #[default]
    LastSeenInOrder,
    /// The `"{date} {time}"` string of the row with the latest parsed timestamp
    ///
    /// Rows whose time does not parse never replace a parsed one. A thread in
    /// which no row parses falls back to the last-seen string.
    MaxParsedTimestamp,
}

/// Sort orders for listing contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactSort {
    /// First-seen order
    #[default]
    Insertion,
    /// Alphabetical by counterparty name
    Name,
    /// Most messages first
    Messages,
    /// Latest contact first; unparseable contact times last
    Recent,
}

/// Insertion-ordered mapping from counterparty URL to conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMap {
    threads: Vec<ConversationThread>,
    index: HashMap<String, usize>,
}

impl ContactMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counterparty if it is not already a key
    ///
    /// Returns true if a new thread was created.
    fn seed(&mut self, url: &str, name: &str) -> bool {
        if url.is_empty() || self.index.contains_key(url) {
            return false;
        }
        self.index.insert(url.to_string(), self.threads.len());
        self.threads
            .push(ConversationThread::new(name.to_string(), url.to_string()));
        true
    }

    fn position(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }

    /// Get the thread for a counterparty URL
    pub fn get(&self, url: &str) -> Option<&ConversationThread> {
        self.position(url).map(|pos| &self.threads[pos])
    }

    /// Whether a counterparty URL is a key
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Number of counterparties
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Whether the map has no threads
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Threads in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &ConversationThread> {
        self.threads.iter()
    }

    /// Counterparty URLs in first-seen order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.threads.iter().map(|t| t.url.as_str())
    }

    /// Consume the map, yielding threads in first-seen order
    pub fn into_threads(self) -> Vec<ConversationThread> {
        self.threads
    }

    /// Find a thread by exact counterparty name
    ///
    /// When several counterparties share a name the last one wins, matching
    /// the name → URL lookup of the conversation picker.
    pub fn find_by_name(&self, name: &str) -> Option<&ConversationThread> {
        self.threads.iter().rev().find(|t| t.name == name)
    }

    /// Threads whose name contains `query`, case-insensitively
    pub fn filter_by_name(&self, query: &str) -> Vec<&ConversationThread> {
        let needle = query.to_lowercase();
        self.threads
            .iter()
            .filter(|t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Threads in the requested order
    pub fn sorted_by(&self, sort: ContactSort) -> Vec<&ConversationThread> {
        let mut threads: Vec<&ConversationThread> = self.threads.iter().collect();
        sort_threads(&mut threads, sort);
        threads
    }

    /// Threads matching `filter_by_name(query)`, in the requested order
    pub fn search(&self, query: &str, sort: ContactSort) -> Vec<&ConversationThread> {
        let mut threads = self.filter_by_name(query);
        sort_threads(&mut threads, sort);
        threads
    }
}

fn sort_threads(threads: &mut [&ConversationThread], sort: ContactSort) {
    match sort {
        ContactSort::Insertion => {}
        ContactSort::Name => threads.sort_by(|a, b| a.name.cmp(&b.name)),
        ContactSort::Messages => {
            threads.sort_by(|a, b| b.message_count().cmp(&a.message_count()))
        }
        ContactSort::Recent => threads.sort_by_key(|t| {
            std::cmp::Reverse(t.last_contact.as_deref().and_then(parse_timestamp))
        }),
    }
}

impl<'a> IntoIterator for &'a ContactMap {
    type Item = &'a ConversationThread;
    type IntoIter = std::slice::Iter<'a, ConversationThread>;

    fn into_iter(self) -> Self::IntoIter {
        self.threads.iter()
    }
}

/// Reconcile a message log into per-counterparty threads
///
/// Pure and deterministic: the same input in the same order always produces
/// the same map. Empty input, or an identity with empty fields, yields a
/// well-defined (possibly empty) result.
///
/// # Example
/// ```rust
/// use outreach_hub::{get_contact_info, Identity, LastContactPolicy, MessageRecord};
///
/// let me = Identity::new("Me", "https://li/me");
/// let rows = vec![
///     MessageRecord {
///         sender_name: "Me".into(),
///         sender_url: "https://li/me".into(),
///         lead_name: "Alice".into(),
///         lead_url: "https://li/alice".into(),
///         date: "2024-01-01".into(),
///         time: "09:00".into(),
///         ..Default::default()
///     },
///     MessageRecord {
///         sender_name: "Alice".into(),
///         sender_url: "https://li/alice".into(),
///         date: "2024-01-01".into(),
///         time: "09:05".into(),
///         ..Default::default()
///     },
/// ];
///
/// let contacts = get_contact_info(&rows, &me, LastContactPolicy::LastSeenInOrder);
/// let alice = contacts.get("https://li/alice").unwrap();
/// assert_eq!((alice.sent_count, alice.received_count), (1, 1));
/// assert_eq!(alice.last_contact.as_deref(), Some("2024-01-01 09:05"));
/// ```
pub fn get_contact_info(
    records: &[MessageRecord],
    identity: &Identity,
    policy: LastContactPolicy,
) -> ContactMap {
    let mut contacts = ContactMap::new();

    // Authorship is evaluated once and shared by both passes
    let authored_by_me: Vec<bool> = records.iter().map(|r| r.is_from(identity)).collect();

    for (record, &mine) in records.iter().zip(&authored_by_me) {
        if mine {
            continue;
        }
        let (url, name) = counterparty_of(record);
        contacts.seed(url, name);
    }

    let mut latest: HashMap<usize, NaiveDateTime> = HashMap::new();

    for (record, &mine) in records.iter().zip(&authored_by_me) {
        let target = if mine {
            record.lead_url.as_str()
        } else {
            counterparty_of(record).0
        };

        let Some(pos) = contacts.position(target) else {
            continue;
        };

        let contact_time = record.contact_time();
        let thread = &mut contacts.threads[pos];
        if mine {
            thread.push_sent(record.clone());
        } else {
            thread.push_received(record.clone());
        }

        match policy {
            LastContactPolicy::LastSeenInOrder => {
                thread.last_contact = Some(contact_time);
            }
            LastContactPolicy::MaxParsedTimestamp => {
                match (parse_timestamp(&contact_time), latest.get(&pos).copied()) {
                    (Some(parsed), Some(best)) if parsed < best => {}
                    (Some(parsed), _) => {
                        latest.insert(pos, parsed);
                        thread.last_contact = Some(contact_time);
                    }
                    (None, Some(_)) => {}
                    (None, None) => thread.last_contact = Some(contact_time),
                }
            }
        }
    }

    tracing::debug!(
        "Reconciled {} messages into {} conversation threads",
        records.len(),
        contacts.len()
    );

    contacts
}

/// Counterparty (URL, name) of a row not authored by me
fn counterparty_of(record: &MessageRecord) -> (&str, &str) {
    let url = if record.sender_url.is_empty() {
        record.lead_url.as_str()
    } else {
        record.sender_url.as_str()
    };
    let name = if record.sender_name.is_empty() {
        record.lead_name.as_str()
    } else {
        record.sender_name.as_str()
    };
    (url, name)
}

/// Aggregate chat statistics shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationStats {
    /// Number of input rows
    pub total_messages: usize,
    /// Rows authored by me
    pub sent_by_me: usize,
    /// Rows not authored by me (`total_messages - sent_by_me`)
    pub received: usize,
    /// Number of counterparties in the reconciled map
    pub contacts: usize,
    /// Distinct non-empty dates
    pub active_days: usize,
}

impl ConversationStats {
    /// Compute statistics over the same records the map was built from
    pub fn compute(records: &[MessageRecord], identity: &Identity, contacts: &ContactMap) -> Self {
        let sent_by_me = records.iter().filter(|r| r.is_from(identity)).count();
        let active_days = records
            .iter()
            .filter(|r| !r.date.is_empty())
            .map(|r| r.date.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_messages: records.len(),
            sent_by_me,
            received: records.len() - sent_by_me,
            contacts: contacts.len(),
            active_days,
        }
    }
}
