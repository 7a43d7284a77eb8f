//! Outbound lead-search notifications
//!
//! A search is a single JSON POST to the client's automation webhook. There is
//! no retry, no backoff and no idempotency key: one call, one outcome. A
//! timeout is reported separately because the remote workflow may still run.

use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Value of the `source` field for searches started from this tool
pub const DEFAULT_SEARCH_SOURCE: &str = "unified_dashboard";

/// Client name used when no profile is active
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// Default webhook timeout
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upper bound for `num_leads`
pub const DEFAULT_MAX_LEADS: u32 = 50;

/// Payload of a lead-search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Job title or keyword to search for
    pub search_term: String,
    /// Target city
    pub city: String,
    /// Target country
    pub country: String,
    /// Number of leads requested
    pub num_leads: u32,
    /// Free-form notes
    pub notes: String,
    /// UTC ISO-8601 creation time
    pub timestamp: String,
    /// Originating tool
    pub source: String,
    /// Client display name
    pub client: String,
    /// Industry filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Company type filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    /// Company size filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    /// Revenue range filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    /// Comma-separated keywords
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl SearchRequest {
    /// Create a request stamped with the current UTC time
    pub fn new(
        search_term: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        num_leads: u32,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            city: city.into(),
            country: country.into(),
            num_leads,
            notes: String::new(),
            timestamp: Utc::now()
                .naive_utc()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            source: DEFAULT_SEARCH_SOURCE.to_string(),
            client: UNKNOWN_CLIENT.to_string(),
            industry: None,
            company_type: None,
            company_size: None,
            revenue: None,
            tags: None,
        }
    }

    /// Attach notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the client display name
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// Set the industry filter
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the company type filter
    pub fn with_company_type(mut self, company_type: impl Into<String>) -> Self {
        self.company_type = Some(company_type.into());
        self
    }

    /// Set the company size filter
    pub fn with_company_size(mut self, company_size: impl Into<String>) -> Self {
        self.company_size = Some(company_size.into());
        self
    }

    /// Set the revenue range filter
    pub fn with_revenue(mut self, revenue: impl Into<String>) -> Self {
        self.revenue = Some(revenue.into());
        self
    }

    /// Set comma-separated keywords
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Short human-readable description, e.g. `"CEO in Berlin, Germany"`
    pub fn summary(&self) -> String {
        match &self.industry {
            Some(industry) => format!(
                "{} in {}, {} ({})",
                self.search_term, self.city, self.country, industry
            ),
            None => format!("{} in {}, {}", self.search_term, self.city, self.country),
        }
    }

    /// Check the request can be sent to `endpoint`
    ///
    /// # Errors
    /// `Error::Config` when the endpoint is empty, `Error::Notifier` when
    /// `num_leads` is outside `1..=max_leads`.
    pub fn validate(&self, endpoint: &str, max_leads: u32) -> Result<()> {
        if endpoint.trim().is_empty() {
            return Err(Error::Config("Webhook URL not configured".to_string()));
        }
        if self.num_leads == 0 || self.num_leads > max_leads {
            return Err(Error::Notifier(format!(
                "Number of leads must be between 1 and {}, got {}",
                max_leads, self.num_leads
            )));
        }
        Ok(())
    }
}

/// Result of a webhook call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotifyOutcome {
    /// True only for HTTP 200
    pub success: bool,
    /// HTTP status, if a response arrived
    pub status: Option<u16>,
    /// Response body, or the transport error message
    pub body: String,
    /// The request timed out; the remote side may still process it
    pub timed_out: bool,
}

impl NotifyOutcome {
    /// Outcome for a response that arrived
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        Self {
            success: status == 200,
            status: Some(status),
            body: body.into(),
            timed_out: false,
        }
    }

    /// Outcome for a request that never got a response
    pub fn transport_failure(message: impl Into<String>, timed_out: bool) -> Self {
        Self {
            success: false,
            status: None,
            body: message.into(),
            timed_out,
        }
    }

    /// Status label for activity logs, e.g. `"Success"` or `"Failed (500)"`
    pub fn status_label(&self) -> String {
        match (self.success, self.status, self.timed_out) {
            (true, _, _) => "Success".to_string(),
            (false, _, true) => "Timeout".to_string(),
            (false, Some(code), false) => format!("Failed ({})", code),
            (false, None, false) => "Error".to_string(),
        }
    }
}

/// Something that can deliver a search request
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `payload` to `endpoint` once
    async fn send(&self, endpoint: &str, payload: &SearchRequest) -> NotifyOutcome;
}

/// Webhook notifier over HTTP
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    timeout: Duration,
}

impl WebhookNotifier {
    /// Create a notifier with a fixed request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Notifier(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// The configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, endpoint: &str, payload: &SearchRequest) -> NotifyOutcome {
        info!("Posting search request to webhook: {}", payload.summary());
        debug!("Webhook endpoint: {}", endpoint);

        let response = match self.client.post(endpoint).json(payload).send().await {
            Ok(response) => response,
            Err(e) => {
                let timed_out = e.is_timeout();
                if timed_out {
                    warn!(
                        "Webhook timed out after {:?}; the search might still process",
                        self.timeout
                    );
                } else {
                    warn!("Webhook request failed: {}", e);
                }
                return NotifyOutcome::transport_failure(e.to_string(), timed_out);
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Failed to read webhook response body: {}", e);
                String::new()
            }
        };

        if status == 200 {
            info!("Search request accepted by webhook");
        } else {
            warn!("Webhook responded with HTTP {}", status);
        }

        NotifyOutcome::from_response(status, body)
    }
}

/// Validate and send a search request
///
/// Validation failures are returned as errors and nothing is sent. Once the
/// request goes out, every result is a `NotifyOutcome`.
pub async fn submit_search<N: Notifier + ?Sized>(
    notifier: &N,
    endpoint: &str,
    request: &SearchRequest,
    max_leads: u32,
) -> Result<NotifyOutcome> {
    request.validate(endpoint, max_leads)?;
    Ok(notifier.send(endpoint, request).await)
}
