// Library Tests - error conversions and display

use crate::Error;

#[test]
fn test_error_display() {
    assert_eq!(
        Error::Config("Webhook URL not configured".to_string()).to_string(),
        "Config error: Webhook URL not configured"
    );
    assert_eq!(Error::Source("HTTP 404".to_string()).to_string(), "Source error: HTTP 404");
}

#[test]
fn test_error_conversions() {
    let io: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, Error::Io(_)));

    let json: Error = serde_json::from_str::<serde_json::Value>("{")
        .expect_err("invalid JSON")
        .into();
    assert!(matches!(json, Error::JsonSerialization(_)));
}
