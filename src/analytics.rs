//! Dashboard analytics
//!
//! Chart series and summary figures derived from typed records: daily message
//! activity, lead status distribution, top cities and outreach performance.
//! Also the lead and message filters behind the list views.

use crate::{
    identity::Identity,
    model::{LeadRecord, MessageRecord},
    timestamp::{parse_date, parse_timestamp},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Status value for leads whose message went out
pub const STATUS_SENT: &str = "sent";
/// Status value for leads waiting on a search or review
pub const STATUS_PENDING: &str = "pending";
/// Status value for leads ready for outreach
pub const STATUS_READY_TO_SEND: &str = "ready_to_send";

/// Messages per `date` value, ascending by date
///
/// Rows with an empty date are skipped. Dates are grouped by their string
/// form and ordered by parsed date where possible.
pub fn daily_message_counts(records: &[MessageRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records.iter().filter(|r| !r.date.is_empty()) {
        *counts.entry(record.date.as_str()).or_default() += 1;
    }

    let mut series: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(date, count)| (date.to_string(), count))
        .collect();
    series.sort_by(|(a, _), (b, _)| (parse_date(a), a).cmp(&(parse_date(b), b)));
    series
}

/// The last `n` points of a series
pub fn last_n_days<T: Clone>(series: &[T], n: usize) -> Vec<T> {
    series[series.len().saturating_sub(n)..].to_vec()
}

/// Count values, most frequent first, ties by name; empty values skipped
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.filter(|v| !v.is_empty()) {
        *counts.entry(value).or_default() += 1;
    }

    let mut counted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    counted.sort_by(|(a_name, a), (b_name, b)| b.cmp(a).then_with(|| a_name.cmp(b_name)));
    counted
}

/// Leads per status
pub fn lead_status_counts(leads: &[LeadRecord]) -> Vec<(String, usize)> {
    value_counts(leads.iter().map(|l| l.status.as_str()))
}

/// The `n` most searched cities
pub fn top_cities(leads: &[LeadRecord], n: usize) -> Vec<(String, usize)> {
    let mut cities = value_counts(leads.iter().map(|l| l.search_city.as_str()));
    cities.truncate(n);
    cities
}

/// Lead counts per day, keyed by the parsed `timestamp` date
///
/// Leads whose timestamp does not parse are left out.
pub fn daily_lead_counts(leads: &[LeadRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<chrono::NaiveDate, usize> = BTreeMap::new();
    for lead in leads {
        if let Some(parsed) = parse_timestamp(&lead.timestamp) {
            *counts.entry(parsed.date()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(date, count)| (date.format("%Y-%m-%d").to_string(), count))
        .collect()
}

/// Headline counts of the outreach table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutreachSummary {
    /// All leads
    pub total: usize,
    /// Status `sent`
    pub sent: usize,
    /// Status `pending`
    pub pending: usize,
    /// Status `ready_to_send`
    pub ready_to_send: usize,
}

impl OutreachSummary {
    /// Count leads by status
    pub fn compute(leads: &[LeadRecord]) -> Self {
        let with_status = |status: &str| leads.iter().filter(|l| l.status == status).count();
        Self {
            total: leads.len(),
            sent: with_status(STATUS_SENT),
            pending: with_status(STATUS_PENDING),
            ready_to_send: with_status(STATUS_READY_TO_SEND),
        }
    }
}

/// Outreach performance figures
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutreachPerformance {
    /// `sent / total` as a percentage, 0 for an empty table
    pub conversion_rate: f64,
    /// Leads with status `sent`
    pub sent: usize,
    /// All leads
    pub total: usize,
    /// Distinct non-empty search terms
    pub unique_search_terms: usize,
    /// Distinct non-empty search cities
    pub unique_cities: usize,
}

impl OutreachPerformance {
    /// Compute performance over the outreach table
    pub fn compute(leads: &[LeadRecord]) -> Self {
        let sent = leads.iter().filter(|l| l.status == STATUS_SENT).count();
        let total = leads.len();
        let distinct = |values: Vec<&str>| {
            values
                .into_iter()
                .filter(|v| !v.is_empty())
                .collect::<HashSet<_>>()
                .len()
        };

        Self {
            conversion_rate: if total == 0 {
                0.0
            } else {
                sent as f64 / total as f64 * 100.0
            },
            sent,
            total,
            unique_search_terms: distinct(leads.iter().map(|l| l.search_term.as_str()).collect()),
            unique_cities: distinct(leads.iter().map(|l| l.search_city.as_str()).collect()),
        }
    }
}

/// Whether a LinkedIn outreach message actually went out
///
/// Email-campaign leads never count; otherwise the `success` column must read
/// `true`, `yes` or `1` (any case).
pub fn is_message_sent(lead: &LeadRecord) -> bool {
    if lead.is_email_lead() {
        return false;
    }
    matches!(lead.success.to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Sort keys for the lead list (all descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSort {
    /// Newest first; unparseable timestamps last
    #[default]
    Timestamp,
    /// Reverse alphabetical by name
    ProfileName,
    /// Reverse alphabetical by status
    Status,
    /// Reverse alphabetical by search city
    SearchCity,
}

/// Lead list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Case-insensitive substring over every column; empty matches all
    pub query: String,
    /// Exact status, `None` for all
    pub status: Option<String>,
    /// Exact search city, `None` for all
    pub city: Option<String>,
}

impl LeadFilter {
    /// Whether a lead passes the filter
    pub fn matches(&self, lead: &LeadRecord) -> bool {
        lead.matches(&self.query)
            && self.status.as_deref().is_none_or(|s| lead.status == s)
            && self.city.as_deref().is_none_or(|c| lead.search_city == c)
    }

    /// Filter then sort leads
    pub fn apply<'a>(&self, leads: &'a [LeadRecord], sort: LeadSort) -> Vec<&'a LeadRecord> {
        let mut selected: Vec<&LeadRecord> = leads.iter().filter(|l| self.matches(l)).collect();
        match sort {
            LeadSort::Timestamp => {
                selected.sort_by_key(|l| Reverse(parse_timestamp(&l.timestamp)))
            }
            LeadSort::ProfileName => {
                selected.sort_by(|a, b| b.profile_name.cmp(&a.profile_name))
            }
            LeadSort::Status => selected.sort_by(|a, b| b.status.cmp(&a.status)),
            LeadSort::SearchCity => selected.sort_by(|a, b| b.search_city.cmp(&a.search_city)),
        }
        selected
    }
}

/// Which side of the conversation to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageDirection {
    /// Everything
    #[default]
    All,
    /// Only messages authored by me
    SentByMe,
    /// Only messages authored by someone else
    Received,
}

/// Message list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageOrder {
    /// Latest first
    #[default]
    NewestFirst,
    /// Earliest first
    OldestFirst,
}

/// Message list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Case-insensitive substring over every field of the message
    pub query: String,
    /// Direction filter
    pub direction: MessageDirection,
    /// Ordering
    pub order: MessageOrder,
}

impl MessageFilter {
    /// Filter then order messages
    pub fn apply<'a>(
        &self,
        records: &'a [MessageRecord],
        identity: &Identity,
    ) -> Vec<&'a MessageRecord> {
        let mut selected: Vec<&MessageRecord> = records
            .iter()
            .filter(|r| match self.direction {
                MessageDirection::All => true,
                MessageDirection::SentByMe => r.is_from(identity),
                MessageDirection::Received => !r.is_from(identity),
            })
            .filter(|r| r.matches(&self.query))
            .collect();

        selected.sort_by_key(|r| message_sort_key(r));
        if self.order == MessageOrder::NewestFirst {
            selected.reverse();
        }
        selected
    }
}

fn message_sort_key(record: &MessageRecord) -> (Option<NaiveDateTime>, String, String) {
    (
        parse_timestamp(&record.contact_time()),
        record.date.clone(),
        record.time.clone(),
    )
}
