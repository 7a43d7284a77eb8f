//! Outreach Hub CLI
//!
//! Drives the outreach analytics library from the terminal: lists reconciled
//! conversations, chat statistics and outreach leads, and triggers lead
//! searches through the client's webhook.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use outreach_hub::{
    analytics::{LeadFilter, LeadSort, MessageDirection, MessageFilter, MessageOrder},
    config::{Settings, DEMO_PROFILE_ID},
    dashboard::{Dashboard, LeadAction},
    identity::initials,
    notifier::WebhookNotifier,
    reconcile::ContactSort,
    session::SessionState,
    source::{sheets::SheetsClient, CachedSource, DataSource, JsonFileSource},
    LastContactPolicy,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Outreach Hub command line
#[derive(Parser, Debug)]
#[command(name = "outreach-hub")]
#[command(version, about = "LinkedIn outreach analytics", long_about = None)]
struct Args {
    /// Settings file
    #[arg(long, global = true, default_value = "outreach.json")]
    config: PathBuf,

    /// Client profile ID
    #[arg(long, short, global = true, default_value = DEMO_PROFILE_ID)]
    profile: String,

    /// Read tables from JSON exports in this directory (overrides settings)
    #[arg(long, global = true, conflicts_with = "sheets")]
    data_dir: Option<PathBuf>,

    /// Read tables from the Google Sheets API
    #[arg(long, global = true)]
    sheets: bool,

    /// Log level filter, used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn,outreach_hub=info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List conversation partners
    Contacts {
        /// Sort order
        #[arg(long, value_enum, default_value = "recent")]
        sort: ContactSortArg,
        /// Only contacts whose name contains this text
        #[arg(long)]
        search: Option<String>,
        /// Use the chronologically latest message as last contact
        #[arg(long)]
        max_timestamp: bool,
    },
    /// Show one conversation
    Conversation {
        /// Contact name as listed by `contacts`
        name: String,
    },
    /// List messages
    Messages {
        /// Which side of the conversation
        #[arg(long, value_enum, default_value = "all")]
        filter: DirectionArg,
        /// Oldest messages first
        #[arg(long)]
        oldest_first: bool,
        /// Only messages containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Chat and outreach statistics
    Stats,
    /// List outreach leads
    Leads {
        #[command(flatten)]
        query: LeadQuery,
    },
    /// Act on one lead
    Lead {
        /// Lead key as listed by `leads`
        key: String,
        #[command(subcommand)]
        action: LeadActionArg,
    },
    /// Mark the first leads of the filtered list as sent
    BulkSend {
        /// How many leads to mark
        #[arg(long, default_value = "5")]
        count: usize,
        #[command(flatten)]
        query: LeadQuery,
    },
    /// Ask the webhook to search for new leads
    Search {
        /// Job title to search for
        #[arg(long)]
        job_title: String,
        /// Target city
        #[arg(long)]
        city: String,
        /// Target country
        #[arg(long)]
        country: String,
        /// Number of leads
        #[arg(long, default_value = "10")]
        num_leads: u32,
        /// Notes passed along with the request
        #[arg(long, default_value = "")]
        notes: String,
    },
}

/// Filter and sort options shared by the lead commands
#[derive(clap::Args, Debug)]
struct LeadQuery {
    /// Only leads with this status
    #[arg(long)]
    status: Option<String>,
    /// Only leads searched in this city
    #[arg(long)]
    city: Option<String>,
    /// Only leads with any column containing this text
    #[arg(long)]
    search: Option<String>,
    /// Sort key (descending)
    #[arg(long, value_enum, default_value = "timestamp")]
    sort: LeadSortArg,
}

impl LeadQuery {
    fn filter(&self) -> LeadFilter {
        LeadFilter {
            query: self.search.clone().unwrap_or_default(),
            status: self.status.clone(),
            city: self.city.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum LeadActionArg {
    /// Mark the lead as sent
    Send,
    /// Star or unstar the lead
    Favorite,
    /// Set the note; an empty note removes it
    Note {
        /// Note text
        text: String,
    },
    /// Add a tag
    Tag {
        /// Tag name
        tag: String,
    },
    /// Remove a tag
    Untag {
        /// Tag name
        tag: String,
    },
    /// Add the lead to the selection
    Select,
    /// Remove the lead from the selection
    Deselect,
}

impl From<&LeadActionArg> for LeadAction {
    fn from(arg: &LeadActionArg) -> Self {
        match arg {
            LeadActionArg::Send => LeadAction::Send,
            LeadActionArg::Favorite => LeadAction::Favorite,
            LeadActionArg::Note { text } => LeadAction::Note(text.clone()),
            LeadActionArg::Tag { tag } => LeadAction::Tag(tag.clone()),
            LeadActionArg::Untag { tag } => LeadAction::Untag(tag.clone()),
            LeadActionArg::Select => LeadAction::Select,
            LeadActionArg::Deselect => LeadAction::Deselect,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ContactSortArg {
    Name,
    Messages,
    Recent,
}

impl From<ContactSortArg> for ContactSort {
    fn from(arg: ContactSortArg) -> Self {
        match arg {
            ContactSortArg::Name => ContactSort::Name,
            ContactSortArg::Messages => ContactSort::Messages,
            ContactSortArg::Recent => ContactSort::Recent,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    All,
    Sent,
    Received,
}

impl From<DirectionArg> for MessageDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::All => MessageDirection::All,
            DirectionArg::Sent => MessageDirection::SentByMe,
            DirectionArg::Received => MessageDirection::Received,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LeadSortArg {
    Timestamp,
    ProfileName,
    Status,
    SearchCity,
}

impl From<LeadSortArg> for LeadSort {
    fn from(arg: LeadSortArg) -> Self {
        match arg {
            LeadSortArg::Timestamp => LeadSort::Timestamp,
            LeadSortArg::ProfileName => LeadSort::ProfileName,
            LeadSortArg::Status => LeadSort::Status,
            LeadSortArg::SearchCity => LeadSort::SearchCity,
        }
    }
}

/// Log to stderr so command output stays clean; RUST_LOG wins over `--log-level`
fn init_logger(log_level: &str) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stderr_layer)
        .init();
}

fn build_source(args: &Args, settings: &Settings) -> Result<Arc<dyn DataSource>> {
    let inner: Arc<dyn DataSource> = if args.sheets {
        info!("Reading tables from the Sheets API");
        Arc::new(SheetsClient::new(
            settings.sheets_api_base.clone(),
            settings.sheets_auth(),
            settings.sheets_timeout(),
        )?)
    } else {
        let dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.data_dir));
        info!("Reading tables from {}", dir.display());
        Arc::new(JsonFileSource::new(dir))
    };

    Ok(Arc::new(CachedSource::with_ttl(inner, settings.cache_ttl())))
}

fn session_path(args: &Args, settings: &Settings) -> PathBuf {
    args.data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.data_dir))
        .join("session.json")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    let mut settings = Settings::load(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;
    settings.apply_env_overrides();
    debug!(
        "Cache TTL {:?}, webhook timeout {:?}, policy {:?}",
        settings.cache_ttl(),
        settings.webhook_timeout(),
        settings.last_contact_policy
    );

    let profile = settings.require_profile(&args.profile)?;
    info!("Working as {} ({})", profile.name, args.profile);

    let source = build_source(&args, &settings)?;
    let dashboard = Dashboard::new(source, profile, &settings);

    match &args.command {
        Command::Contacts {
            sort,
            search,
            max_timestamp,
        } => {
            let dashboard = if *max_timestamp {
                dashboard.with_policy(LastContactPolicy::MaxParsedTimestamp)
            } else {
                dashboard
            };
            let chat = dashboard.chat_analytics().await;
            let shown = chat
                .contacts
                .search(search.as_deref().unwrap_or(""), (*sort).into());

            println!("{} contacts", shown.len());
            for thread in shown {
                println!(
                    "[{}] {}  {}  sent {}  received {}  last {}",
                    thread.initials(),
                    thread.name,
                    thread.url,
                    thread.sent_count,
                    thread.received_count,
                    thread.last_contact.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Conversation { name } => {
            let chat = dashboard.chat_analytics().await;
            let Some(thread) = chat.contacts.find_by_name(name) else {
                anyhow::bail!("No conversation with {}", name);
            };

            println!("Conversation with {} ({})", thread.name, thread.url);
            println!(
                "{} messages, {} sent, {} received",
                thread.message_count(),
                thread.sent_count,
                thread.received_count
            );

            let identity = dashboard.identity();
            for message in thread.sorted_messages() {
                let who = if message.is_from(&identity) {
                    "You".to_string()
                } else {
                    message.sender_name.clone()
                };
                println!("{} {}  {}: {}", message.date, message.time, who, message.message);
                if !message.shared_content.is_empty() {
                    println!("    attachment: {}", message.shared_content);
                }
            }
        }
        Command::Messages {
            filter,
            oldest_first,
            search,
        } => {
            let records = dashboard.load_messages().await;
            let identity = dashboard.identity();
            let message_filter = MessageFilter {
                query: search.clone().unwrap_or_default(),
                direction: (*filter).into(),
                order: if *oldest_first {
                    MessageOrder::OldestFirst
                } else {
                    MessageOrder::NewestFirst
                },
            };

            let shown = message_filter.apply(&records, &identity);
            println!("{} messages", shown.len());
            for message in shown {
                let arrow = if message.is_from(&identity) { "->" } else { "<-" };
                let other = if message.is_from(&identity) {
                    &message.lead_name
                } else {
                    &message.sender_name
                };
                println!(
                    "{} {} {} [{}] {}: {}",
                    message.date,
                    message.time,
                    arrow,
                    initials(other),
                    other,
                    message.message
                );
            }
        }
        Command::Stats => {
            let chat = dashboard.chat_analytics().await;
            let outreach = dashboard.outreach().await;
            let session = SessionState::load(session_path(&args, &settings))?;
            let searches = session.search_stats();

            println!("Chat");
            println!("  total messages  {}", chat.stats.total_messages);
            println!("  sent by me      {}", chat.stats.sent_by_me);
            println!("  received        {}", chat.stats.received);
            println!("  contacts        {}", chat.stats.contacts);
            println!("  active days     {}", chat.stats.active_days);
            println!("Outreach");
            println!("  total leads     {}", outreach.summary.total);
            println!("  sent            {}", outreach.summary.sent);
            println!("  pending         {}", outreach.summary.pending);
            println!("  ready to send   {}", outreach.summary.ready_to_send);
            println!(
                "  conversion      {:.1}% ({} of {} sent)",
                outreach.performance.conversion_rate,
                outreach.performance.sent,
                outreach.performance.total
            );
            println!(
                "  search terms    {}",
                outreach.performance.unique_search_terms
            );
            println!("  cities          {}", outreach.performance.unique_cities);
            println!("Searches this session");
            println!(
                "  {} of {} accepted ({:.1}%)",
                searches.successful, searches.total, searches.success_rate
            );

            if !outreach.status_counts.is_empty() {
                println!("Status distribution");
                for (status, count) in &outreach.status_counts {
                    println!("  {:<16}{}", status, count);
                }
            }
            if !outreach.top_cities.is_empty() {
                println!("Top cities");
                for (city, count) in &outreach.top_cities {
                    println!("  {:<16}{}", city, count);
                }
            }
            if !chat.daily_messages.is_empty() {
                println!("Daily messages");
                for (date, count) in &chat.daily_messages {
                    println!("  {:<16}{}", date, count);
                }
            }
        }
        Command::Leads { query } => {
            let leads = dashboard.load_leads().await;
            let session = SessionState::load(session_path(&args, &settings))?;

            let shown = query.filter().apply(&leads, query.sort.into());
            println!("Showing {} leads", shown.len());
            for lead in shown {
                let key = lead.key();
                let star = if session.is_favorite(&key) { "*" } else { " " };
                let selected = if session.is_selected(&key) { "+" } else { " " };
                let sent = if session.is_lead_sent(lead) { "SENT" } else { "    " };
                println!(
                    "{}{} {} {}  {}  {}  {}  {}",
                    star,
                    selected,
                    sent,
                    lead.display_name(),
                    lead.company_name,
                    lead.search_city,
                    lead.status,
                    lead.timestamp
                );
                println!("    key: {}", key);
                if let Some(note) = session.note(&key) {
                    println!("    note: {}", note);
                }
                let tags = session.tags(&key);
                if !tags.is_empty() {
                    println!("    tags: {}", tags.join(", "));
                }
            }
        }
        Command::Lead { key, action } => {
            let path = session_path(&args, &settings);
            let mut session = SessionState::load(&path)?;
            let action = LeadAction::from(action);

            let (lead, changed) = dashboard
                .apply_lead_action(&mut session, key, &action)
                .await?;
            if changed {
                session.save(&path)?;
            }

            let name = lead.display_name();
            match action {
                LeadAction::Send if changed => println!("Message sent to {}", name),
                LeadAction::Send => println!("{} was already sent", name),
                LeadAction::Favorite if session.is_favorite(key) => {
                    println!("{} starred", name)
                }
                LeadAction::Favorite => println!("{} unstarred", name),
                LeadAction::Note(_) => match session.note(key) {
                    Some(note) => println!("Note for {}: {}", name, note),
                    None => println!("Note for {} removed", name),
                },
                LeadAction::Tag(_) | LeadAction::Untag(_) => {
                    println!("Tags for {}: {}", name, session.tags(key).join(", "))
                }
                LeadAction::Select | LeadAction::Deselect => println!(
                    "{} selected lead(s)",
                    session.selected_leads.len()
                ),
            }
        }
        Command::BulkSend { count, query } => {
            let path = session_path(&args, &settings);
            let mut session = SessionState::load(&path)?;

            let marked = dashboard
                .bulk_send(&mut session, &query.filter(), query.sort.into(), *count)
                .await;
            session.save(&path)?;
            println!("Successfully sent {} messages", marked);
        }
        Command::Search {
            job_title,
            city,
            country,
            num_leads,
            notes,
        } => {
            let path = session_path(&args, &settings);
            let mut session = SessionState::load(&path)?;
            let notifier = WebhookNotifier::new(settings.webhook_timeout())?;
            let request = dashboard
                .search_request(job_title, city, country, *num_leads)
                .with_notes(notes.clone());

            let outcome = dashboard
                .run_search(&notifier, &mut session, &request)
                .await?;
            session.save(&path)?;

            if outcome.success {
                println!("Search initiated for {}", request.summary());
                println!("Results will appear in the outreach sheet shortly");
            } else if outcome.timed_out {
                println!("Request timed out; the search might still process");
            } else {
                match outcome.status {
                    Some(code) => println!("Error: HTTP {}", code),
                    None => println!("Error: {}", outcome.body),
                }
            }
        }
    }

    Ok(())
}
