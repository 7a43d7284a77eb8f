//! Outreach lead records

use crate::model::row::{field, field_any, row_contains, Row};
use serde::{Deserialize, Serialize};

/// One row of the outreach sheet
///
/// The typed fields cover the columns the dashboard reads; `raw` keeps the
/// original row so free-text search can look at every column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Position of the row in the source table
    pub index: usize,
    /// Lead display name (`profile_name`, fallback `name`)
    pub profile_name: String,
    /// Lead location (`profile_location`, fallback `location`)
    pub profile_location: String,
    /// Lead headline (`profile_tagline`, fallback `tagline`)
    pub profile_tagline: String,
    /// Company name
    pub company_name: String,
    /// Lead profile URL
    pub linkedin_url: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone_number: String,
    /// Outreach status (e.g. "sent", "pending", "ready_to_send")
    pub status: String,
    /// When the lead was found or contacted
    pub timestamp: String,
    /// Job title searched for
    pub search_term: String,
    /// City searched in
    pub search_city: String,
    /// Country searched in
    pub search_country: String,
    /// Whether the outreach message went out ("true", "yes", "1", ...)
    pub success: String,
    /// LinkedIn connection status
    pub connection_status: String,
    /// Email campaign subject, if this lead was emailed
    pub email_subject: String,
    /// Email campaign body, if this lead was emailed
    pub email_message: String,
    /// The untouched source row
    pub raw: Row,
}

impl LeadRecord {
    /// Build a lead from a raw row at position `index`
    pub fn from_row(index: usize, row: &Row) -> Self {
        Self {
            index,
            profile_name: field_any(row, &["profile_name", "name"]),
            profile_location: field_any(row, &["profile_location", "location"]),
            profile_tagline: field_any(row, &["profile_tagline", "tagline"]),
            company_name: field(row, "company_name"),
            linkedin_url: field(row, "linkedin_url"),
            email: field(row, "email"),
            phone_number: field(row, "phone_number"),
            status: field(row, "status"),
            timestamp: field(row, "timestamp"),
            search_term: field(row, "search_term"),
            search_city: field(row, "search_city"),
            search_country: field(row, "search_country"),
            success: field(row, "success"),
            connection_status: field(row, "connection_status"),
            email_subject: field(row, "email_subject"),
            email_message: field(row, "email_message"),
            raw: row.clone(),
        }
    }

    /// Convert a batch of rows, numbering them in source order
    pub fn from_rows(rows: &[Row]) -> Vec<Self> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| Self::from_row(index, row))
            .collect()
    }

    /// Stable key for session bookkeeping: the profile URL, else `row:<index>`
    pub fn key(&self) -> String {
        if self.linkedin_url.is_empty() {
            format!("row:{}", self.index)
        } else {
            self.linkedin_url.clone()
        }
    }

    /// Display name, `"Lead"` when the sheet has none
    pub fn display_name(&self) -> &str {
        if self.profile_name.is_empty() {
            "Lead"
        } else {
            &self.profile_name
        }
    }

    /// The profile handle from a `/in/<handle>/` URL
    pub fn profile_handle(&self) -> Option<&str> {
        let (_, tail) = self.linkedin_url.split_once("/in/")?;
        let handle = tail.trim_end_matches('/');
        let handle = handle.split('/').next().unwrap_or(handle);
        if handle.is_empty() { None } else { Some(handle) }
    }

    /// Whether this lead belongs to the email campaign
    pub fn is_email_lead(&self) -> bool {
        !self.email_subject.is_empty() || !self.email_message.is_empty()
    }

    /// Case-insensitive substring search across every source column
    pub fn matches(&self, query: &str) -> bool {
        row_contains(&self.raw, query)
    }
}
