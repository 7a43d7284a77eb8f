//! Configuration
//!
//! - `settings` - tunables and client profiles persisted as JSON
//! - `profile` - client profiles and the built-in profile registry

pub mod profile;
pub mod settings;

pub use profile::{builtin_profile, ClientProfile, DEMO_PROFILE_ID};
pub use settings::{Settings, ENV_SHEETS_API_KEY, ENV_SHEETS_TOKEN, ENV_WEBHOOK_URL};
