//! Application settings and configuration

use crate::{
    config::profile::{builtin_profile, ClientProfile},
    notifier::{DEFAULT_MAX_LEADS, DEFAULT_WEBHOOK_TIMEOUT},
    reconcile::LastContactPolicy,
    source::{
        cache::DEFAULT_CACHE_TTL,
        sheets::{SheetsAuth, DEFAULT_SHEETS_API_BASE, DEFAULT_SHEETS_TIMEOUT},
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `sheets_token`
pub const ENV_SHEETS_TOKEN: &str = "OUTREACH_SHEETS_TOKEN";
/// Environment variable overriding `sheets_api_key`
pub const ENV_SHEETS_API_KEY: &str = "OUTREACH_SHEETS_API_KEY";
/// Environment variable overriding every profile's webhook URL
pub const ENV_WEBHOOK_URL: &str = "OUTREACH_WEBHOOK_URL";

/// Application settings
///
/// Stored as JSON. Keys missing from the file take their default value.
///
/// # Example
/// ```rust,no_run
/// use outreach_hub::config::Settings;
///
/// // Load settings (returns default if file doesn't exist)
/// let settings = Settings::load("outreach.json").expect("Failed to load");
///
/// let profile = settings.profile("demo").expect("demo profile is built in");
/// println!("Working as {}", profile.name);
/// println!("Cache TTL: {:?}", settings.cache_ttl());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How long fetched tables are reused, in seconds
    pub cache_ttl_secs: u64,
    /// Webhook request timeout in seconds
    pub webhook_timeout_secs: u64,
    /// Sheets fetch timeout in seconds
    pub sheets_timeout_secs: u64,
    /// Upper bound for leads per search request
    pub max_leads_per_search: u32,
    /// How a thread's last contact time is chosen
    pub last_contact_policy: LastContactPolicy,
    /// Sheets API root
    pub sheets_api_base: String,
    /// Pre-issued OAuth bearer token for the Sheets API
    pub sheets_token: Option<String>,
    /// Sheets API key (public sheets only)
    pub sheets_api_key: Option<String>,
    /// Directory holding local JSON exports
    pub data_dir: String,
    /// Client profiles by ID
    pub profiles: BTreeMap<String, ClientProfile>,
    /// Webhook URL taken from the environment, applied to every profile
    #[serde(skip)]
    pub webhook_url_override: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            webhook_timeout_secs: DEFAULT_WEBHOOK_TIMEOUT.as_secs(),
            sheets_timeout_secs: DEFAULT_SHEETS_TIMEOUT.as_secs(),
            max_leads_per_search: DEFAULT_MAX_LEADS,
            last_contact_policy: LastContactPolicy::default(),
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            sheets_token: None,
            sheets_api_key: None,
            data_dir: "./data".to_string(),
            profiles: BTreeMap::new(),
            webhook_url_override: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    /// The loaded settings, or default settings if the file doesn't exist or is empty
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to a JSON file, creating the parent directory if needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create settings directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, json)
            .map_err(|e| Error::Config(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Cache TTL as a `Duration`
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Webhook timeout as a `Duration`
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    /// Sheets fetch timeout as a `Duration`
    pub fn sheets_timeout(&self) -> Duration {
        Duration::from_secs(self.sheets_timeout_secs)
    }

    /// Sheets authorisation, preferring the bearer token over the API key
    pub fn sheets_auth(&self) -> SheetsAuth {
        match (&self.sheets_token, &self.sheets_api_key) {
            (Some(token), _) if !token.is_empty() => SheetsAuth::BearerToken(token.clone()),
            (_, Some(key)) if !key.is_empty() => SheetsAuth::ApiKey(key.clone()),
            _ => SheetsAuth::Anonymous,
        }
    }

    /// Look up a client profile
    ///
    /// Profiles from the settings file shadow built-in ones. The environment
    /// webhook override, if any, is applied to the returned profile.
    pub fn profile(&self, id: &str) -> Option<ClientProfile> {
        let mut profile = self
            .profiles
            .get(id)
            .cloned()
            .or_else(|| builtin_profile(id))?;

        if let Some(url) = &self.webhook_url_override {
            profile.webhook_url = url.clone();
        }
        Some(profile)
    }

    /// Like `profile`, but a missing profile is an error
    pub fn require_profile(&self, id: &str) -> Result<ClientProfile> {
        self.profile(id)
            .ok_or_else(|| Error::Config(format!("Unknown client profile: {}", id)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(ENV_SHEETS_TOKEN) {
            self.sheets_token = Some(token);
        }
        if let Some(key) = non_empty(ENV_SHEETS_API_KEY) {
            self.sheets_api_key = Some(key);
        }
        if let Some(url) = non_empty(ENV_WEBHOOK_URL) {
            self.webhook_url_override = Some(url);
        }
    }
}
