//! Self identity and authorship matching
//!
//! Messages are attributed to "me" by case-insensitive substring matching of
//! the operator's display name and profile URL against the sender columns.
//! A self name of "Dan" therefore also matches "Daniela Smith".

use serde::{Deserialize, Serialize};

/// The operator's own display name and canonical profile URL
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    /// Display name (e.g., "Donmenico Hudson")
    pub name: String,
    /// Canonical profile URL (e.g., "https://www.linkedin.com/in/donmenicohudson/")
    pub url: String,
}

impl Identity {
    /// Create a new identity
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Check whether a sender is the operator
///
/// Returns false when `sender_name` is empty. Otherwise returns true if the
/// lower-cased self name is a substring of the lower-cased sender name, or if a
/// non-empty sender URL contains the lower-cased self URL.
///
/// # Example
/// ```rust
/// use outreach_hub::{is_me, Identity};
///
/// let me = Identity::new("Dan", "https://x/in/dan");
/// assert!(is_me("Daniela Smith", None, &me));
/// assert!(!is_me("", Some("https://x/in/dan"), &me));
/// ```
pub fn is_me(sender_name: &str, sender_url: Option<&str>, identity: &Identity) -> bool {
    if sender_name.is_empty() {
        return false;
    }

    if sender_name
        .to_lowercase()
        .contains(&identity.name.to_lowercase())
    {
        return true;
    }

    match sender_url {
        Some(url) if !url.is_empty() => url.to_lowercase().contains(&identity.url.to_lowercase()),
        _ => false,
    }
}

/// Initials for a display name
///
/// `"?"` for an empty name, the first letters of the first two words when
/// there are at least two, otherwise the first letter.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = match words.next() {
        Some(word) => word,
        None => return "?".to_string(),
    };

    let mut out: String = first.chars().take(1).collect();
    if let Some(second) = words.next() {
        out.extend(second.chars().take(1));
    }
    out.to_uppercase()
}
