//! Client profiles

use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// ID of the profile that ships with the crate
pub const DEMO_PROFILE_ID: &str = "demo";

/// Default worksheet name
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Everything needed to work on behalf of one client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Client display name, also their LinkedIn sender name
    pub name: String,
    /// Client LinkedIn profile URL
    pub linkedin_url: String,
    /// Spreadsheet holding the chat history
    #[serde(default)]
    pub chat_sheet_id: String,
    /// Worksheet holding the chat history
    #[serde(default = "default_sheet_name")]
    pub chat_sheet_name: String,
    /// Spreadsheet holding the outreach leads
    #[serde(default)]
    pub outreach_sheet_id: String,
    /// Worksheet holding the outreach leads
    #[serde(default = "default_sheet_name")]
    pub outreach_sheet_name: String,
    /// Lead-search webhook
    #[serde(default)]
    pub webhook_url: String,
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

impl ClientProfile {
    /// The identity used to recognise the client's own messages
    pub fn identity(&self) -> Identity {
        Identity::new(self.name.clone(), self.linkedin_url.clone())
    }

    /// Whether a chat history source is configured
    pub fn has_chat_source(&self) -> bool {
        !self.chat_sheet_id.is_empty()
    }

    /// Whether an outreach source is configured
    pub fn has_outreach_source(&self) -> bool {
        !self.outreach_sheet_id.is_empty()
    }
}

/// Look up a profile compiled into the crate
pub fn builtin_profile(id: &str) -> Option<ClientProfile> {
    match id {
        DEMO_PROFILE_ID => Some(ClientProfile {
            name: "Demo User".to_string(),
            linkedin_url: "https://www.linkedin.com/in/demo/".to_string(),
            chat_sheet_id: String::new(),
            chat_sheet_name: default_sheet_name(),
            outreach_sheet_id: String::new(),
            outreach_sheet_name: default_sheet_name(),
            webhook_url: String::new(),
        }),
        _ => None,
    }
}
