//! Dashboard service
//!
//! Combines a data source, a client profile and the reconciler into the data
//! behind each dashboard view, and wires the search action to session
//! bookkeeping.

use crate::{
    analytics::{
        daily_lead_counts, daily_message_counts, lead_status_counts, top_cities, LeadFilter,
        LeadSort, OutreachPerformance, OutreachSummary,
    },
    config::{ClientProfile, Settings},
    identity::Identity,
    model::{LeadRecord, MessageRecord},
    notifier::{submit_search, Notifier, NotifyOutcome, SearchRequest},
    reconcile::{get_contact_info, ContactMap, ConversationStats, LastContactPolicy},
    session::SessionState,
    source::{load_rows, DataSource},
    Error, Result,
};
use tracing::{debug, info};

/// Number of cities shown in the city chart
pub const TOP_CITIES: usize = 15;

/// Data for the chat analytics view
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnalytics {
    /// Messages in source order
    pub records: Vec<MessageRecord>,
    /// Reconciled conversation threads
    pub contacts: ContactMap,
    /// Aggregate statistics
    pub stats: ConversationStats,
    /// Messages per day, ascending
    pub daily_messages: Vec<(String, usize)>,
}

/// Data for the outreach view
#[derive(Debug, Clone, PartialEq)]
pub struct OutreachView {
    /// Leads in source order
    pub leads: Vec<LeadRecord>,
    /// Headline counts
    pub summary: OutreachSummary,
    /// Conversion figures
    pub performance: OutreachPerformance,
    /// Leads per status
    pub status_counts: Vec<(String, usize)>,
    /// Most searched cities
    pub top_cities: Vec<(String, usize)>,
    /// Leads found per day
    pub daily_leads: Vec<(String, usize)>,
}

/// Data for the overview page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    /// Chat statistics
    pub chat: ConversationStats,
    /// Outreach counts
    pub outreach: OutreachSummary,
    /// Outreach conversion
    pub performance: OutreachPerformance,
}

/// Something done to a single lead from the lead list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadAction {
    /// Mark the lead as sent
    Send,
    /// Flip the favorite flag
    Favorite,
    /// Replace the note; blank text removes it
    Note(String),
    /// Add a tag
    Tag(String),
    /// Remove a tag
    Untag(String),
    /// Add the lead to the selection
    Select,
    /// Remove the lead from the selection
    Deselect,
}

/// Dashboard for one client profile
pub struct Dashboard<S> {
    source: S,
    profile: ClientProfile,
    policy: LastContactPolicy,
    max_leads: u32,
}

impl<S: DataSource> Dashboard<S> {
    /// Create a dashboard reading from `source` on behalf of `profile`
    pub fn new(source: S, profile: ClientProfile, settings: &Settings) -> Self {
        Self {
            source,
            profile,
            policy: settings.last_contact_policy,
            max_leads: settings.max_leads_per_search,
        }
    }

    /// Override the last-contact policy
    pub fn with_policy(mut self, policy: LastContactPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active profile
    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    /// The identity used to classify messages
    pub fn identity(&self) -> Identity {
        self.profile.identity()
    }

    /// The data source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the chat history; an unavailable source yields no messages
    pub async fn load_messages(&self) -> Vec<MessageRecord> {
        let rows = load_rows(
            &self.source,
            &self.profile.chat_sheet_id,
            &self.profile.chat_sheet_name,
        )
        .await;
        MessageRecord::from_rows(&rows)
    }

    /// Load the outreach leads; an unavailable source yields no leads
    pub async fn load_leads(&self) -> Vec<LeadRecord> {
        let rows = load_rows(
            &self.source,
            &self.profile.outreach_sheet_id,
            &self.profile.outreach_sheet_name,
        )
        .await;
        LeadRecord::from_rows(&rows)
    }

    /// Reconcile already-loaded messages
    pub fn analyze_messages(&self, records: Vec<MessageRecord>) -> ChatAnalytics {
        let identity = self.identity();
        let contacts = get_contact_info(&records, &identity, self.policy);
        let stats = ConversationStats::compute(&records, &identity, &contacts);
        let daily_messages = daily_message_counts(&records);

        ChatAnalytics {
            records,
            contacts,
            stats,
            daily_messages,
        }
    }

    /// Summarise already-loaded leads
    pub fn analyze_leads(&self, leads: Vec<LeadRecord>) -> OutreachView {
        OutreachView {
            summary: OutreachSummary::compute(&leads),
            performance: OutreachPerformance::compute(&leads),
            status_counts: lead_status_counts(&leads),
            top_cities: top_cities(&leads, TOP_CITIES),
            daily_leads: daily_lead_counts(&leads),
            leads,
        }
    }

    /// Chat analytics view
    pub async fn chat_analytics(&self) -> ChatAnalytics {
        let records = self.load_messages().await;
        self.analyze_messages(records)
    }

    /// Outreach view
    pub async fn outreach(&self) -> OutreachView {
        let leads = self.load_leads().await;
        self.analyze_leads(leads)
    }

    /// Overview page
    pub async fn overview(&self) -> Overview {
        let chat = self.chat_analytics().await;
        let outreach = self.outreach().await;
        Overview {
            chat: chat.stats,
            outreach: outreach.summary,
            performance: outreach.performance,
        }
    }

    /// Find a lead by its key
    pub async fn find_lead(&self, key: &str) -> Option<LeadRecord> {
        self.load_leads().await.into_iter().find(|lead| lead.key() == key)
    }

    /// Apply an action to one lead and return the lead
    ///
    /// Returns true alongside the lead when the session changed.
    ///
    /// # Errors
    /// Returns an error when no lead has the given key.
    pub async fn apply_lead_action(
        &self,
        session: &mut SessionState,
        key: &str,
        action: &LeadAction,
    ) -> Result<(LeadRecord, bool)> {
        let lead = self
            .find_lead(key)
            .await
            .ok_or_else(|| Error::Session(format!("Unknown lead: {}", key)))?;

        let changed = match action {
            LeadAction::Send => session.send_to(&lead),
            LeadAction::Favorite => {
                session.toggle_favorite(key);
                true
            }
            LeadAction::Note(text) => {
                let before = session.note(key).map(str::to_string);
                session.set_note(key, text);
                before.as_deref() != session.note(key)
            }
            LeadAction::Tag(tag) => session.add_tag(key, tag),
            LeadAction::Untag(tag) => session.remove_tag(key, tag),
            LeadAction::Select => {
                let already = session.is_selected(key);
                session.select_lead(key);
                !already
            }
            LeadAction::Deselect => session.deselect_lead(key),
        };
        debug!("{:?} on lead {} (changed: {})", action, key, changed);
        Ok((lead, changed))
    }

    /// Mark the first `count` leads of a filtered list as sent
    ///
    /// Returns how many leads were marked.
    pub async fn bulk_send(
        &self,
        session: &mut SessionState,
        filter: &LeadFilter,
        sort: LeadSort,
        count: usize,
    ) -> usize {
        let leads = self.load_leads().await;
        let batch: Vec<LeadRecord> = filter.apply(&leads, sort).into_iter().cloned().collect();
        let marked = session.bulk_mark_sent(&batch, count);
        info!("Bulk send marked {} of {} leads", marked, batch.len());
        marked
    }

    /// Build a search request stamped with this profile's client name
    pub fn search_request(
        &self,
        search_term: &str,
        city: &str,
        country: &str,
        num_leads: u32,
    ) -> SearchRequest {
        SearchRequest::new(search_term, city, country, num_leads).with_client(self.profile.name.clone())
    }

    /// Send a search request to the profile's webhook and record it in the session
    ///
    /// # Errors
    /// Returns an error, without sending or recording anything, when the
    /// webhook is not configured or the lead count is out of range.
    pub async fn run_search<N: Notifier + ?Sized>(
        &self,
        notifier: &N,
        session: &mut SessionState,
        request: &SearchRequest,
    ) -> Result<NotifyOutcome> {
        let outcome =
            submit_search(notifier, &self.profile.webhook_url, request, self.max_leads).await?;
        session.record_search(request, &outcome);
        info!(
            "Search '{}' finished: {}",
            request.summary(),
            outcome.status_label()
        );
        Ok(outcome)
    }
}
