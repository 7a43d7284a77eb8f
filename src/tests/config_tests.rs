// Config Tests - settings persistence, profiles and overrides

use crate::config::{builtin_profile, ClientProfile, Settings, DEMO_PROFILE_ID};
use crate::reconcile::LastContactPolicy;
use crate::source::sheets::SheetsAuth;
use crate::Error;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

fn acme() -> ClientProfile {
    ClientProfile {
        name: "Acme Sales".to_string(),
        linkedin_url: "https://www.linkedin.com/in/acme-sales/".to_string(),
        chat_sheet_id: "chat-sheet".to_string(),
        chat_sheet_name: "linkedin_chat_history".to_string(),
        outreach_sheet_id: "outreach-sheet".to_string(),
        outreach_sheet_name: "Sheet1".to_string(),
        webhook_url: "https://hooks.example.com/leads".to_string(),
    }
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.cache_ttl(), Duration::from_secs(60));
    assert_eq!(settings.webhook_timeout(), Duration::from_secs(10));
    assert_eq!(settings.sheets_timeout(), Duration::from_secs(10));
    assert_eq!(settings.max_leads_per_search, 50);
    assert_eq!(settings.last_contact_policy, LastContactPolicy::LastSeenInOrder);
    assert_eq!(settings.sheets_api_base, "https://sheets.googleapis.com");
    assert_eq!(settings.data_dir, "./data");
    assert!(settings.profiles.is_empty());
    assert_eq!(settings.sheets_auth(), SheetsAuth::Anonymous);
}

#[test]
fn test_settings_load_missing_or_empty_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let missing = Settings::load(dir.path().join("missing.json")).expect("missing file");
    assert_eq!(missing, Settings::default());

    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), "   ").expect("write");
    let empty = Settings::load(temp_file.path()).expect("empty file");
    assert_eq!(empty, Settings::default());
}

#[test]
fn test_settings_partial_file_uses_defaults() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(
        temp_file.path(),
        r#"{"cache_ttl_secs": 5, "last_contact_policy": "max_parsed_timestamp"}"#,
    )
    .expect("write");

    let settings = Settings::load(temp_file.path()).expect("load");
    assert_eq!(settings.cache_ttl_secs, 5);
    assert_eq!(settings.last_contact_policy, LastContactPolicy::MaxParsedTimestamp);
    assert_eq!(settings.webhook_timeout_secs, 10);
    assert_eq!(settings.sheets_timeout_secs, 10);
}

#[test]
fn test_sheets_timeout_from_file() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), r#"{"sheets_timeout_secs": 4}"#).expect("write");

    let settings = Settings::load(temp_file.path()).expect("load");
    assert_eq!(settings.sheets_timeout(), Duration::from_secs(4));
    assert_eq!(settings.webhook_timeout(), Duration::from_secs(10));
}

#[test]
fn test_settings_invalid_file() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), "{ nope").expect("write");
    assert!(matches!(Settings::load(temp_file.path()), Err(Error::Config(_))));
}

#[test]
fn test_settings_save_load_roundtrip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config").join("outreach.json");

    let mut settings = Settings::default();
    settings.webhook_timeout_secs = 15;
    settings.sheets_token = Some("token".to_string());
    settings.profiles.insert("acme".to_string(), acme());
    settings.save(&path).expect("Failed to save settings");

    let loaded = Settings::load(&path).expect("Failed to load settings");
    assert_eq!(loaded, settings);
    assert_eq!(loaded.webhook_timeout(), Duration::from_secs(15));
}

#[test]
fn test_profile_lookup() {
    let mut settings = Settings::default();
    settings.profiles.insert("acme".to_string(), acme());

    assert_eq!(settings.profile("acme"), Some(acme()));
    assert_eq!(settings.profile(DEMO_PROFILE_ID), builtin_profile(DEMO_PROFILE_ID));
    assert!(settings.profile("nobody").is_none());
    assert!(matches!(settings.require_profile("nobody"), Err(Error::Config(_))));
}

#[test]
fn test_file_profiles_shadow_builtin() {
    let mut settings = Settings::default();
    settings.profiles.insert(DEMO_PROFILE_ID.to_string(), acme());
    assert_eq!(settings.profile(DEMO_PROFILE_ID).map(|p| p.name), Some("Acme Sales".to_string()));
}

#[test]
fn test_demo_profile() {
    let demo = builtin_profile(DEMO_PROFILE_ID).expect("demo profile");
    assert_eq!(demo.name, "Demo User");
    assert!(!demo.has_chat_source());
    assert!(!demo.has_outreach_source());
    assert!(demo.webhook_url.is_empty());

    let identity = demo.identity();
    assert_eq!(identity.name, "Demo User");
    assert_eq!(identity.url, "https://www.linkedin.com/in/demo/");
}

#[test]
fn test_profile_sheet_names_default() {
    let profile: ClientProfile = serde_json::from_str(
        r#"{"name": "Acme", "linkedin_url": "https://www.linkedin.com/in/acme/"}"#,
    )
    .expect("parse");
    assert_eq!(profile.chat_sheet_name, "Sheet1");
    assert_eq!(profile.outreach_sheet_name, "Sheet1");
    assert!(profile.chat_sheet_id.is_empty());
}

#[test]
fn test_sheets_auth_preference() {
    let mut settings = Settings::default();
    settings.sheets_api_key = Some("key".to_string());
    assert_eq!(settings.sheets_auth(), SheetsAuth::ApiKey("key".to_string()));

    settings.sheets_token = Some("token".to_string());
    assert_eq!(settings.sheets_auth(), SheetsAuth::BearerToken("token".to_string()));

    settings.sheets_token = Some(String::new());
    assert_eq!(settings.sheets_auth(), SheetsAuth::ApiKey("key".to_string()));
}

#[test]
fn test_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("OUTREACH_SHEETS_TOKEN", "env-token"),
        ("OUTREACH_SHEETS_API_KEY", ""),
        ("OUTREACH_WEBHOOK_URL", "https://override.example.com/hook"),
    ]);

    let mut settings = Settings::default();
    settings.sheets_api_key = Some("file-key".to_string());
    settings.profiles.insert("acme".to_string(), acme());
    settings.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.sheets_token.as_deref(), Some("env-token"));
    assert_eq!(settings.sheets_api_key.as_deref(), Some("file-key"));
    assert_eq!(
        settings.profile("acme").map(|p| p.webhook_url),
        Some("https://override.example.com/hook".to_string())
    );
    assert_eq!(
        settings.profile(DEMO_PROFILE_ID).map(|p| p.webhook_url),
        Some("https://override.example.com/hook".to_string())
    );
}

#[test]
fn test_override_is_not_persisted() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let mut settings = Settings::default();
    settings.webhook_url_override = Some("https://override.example.com".to_string());
    settings.save(temp_file.path()).expect("save");

    let loaded = Settings::load(temp_file.path()).expect("load");
    assert!(loaded.webhook_url_override.is_none());
}
