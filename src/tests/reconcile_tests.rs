// Reconcile Tests - grouping the message log into conversation threads

use super::fixtures::message;
use crate::identity::Identity;
use crate::model::MessageRecord;
use crate::reconcile::{get_contact_info, ContactSort, ConversationStats, LastContactPolicy};

const ALICE: &str = "https://li/alice";
const BOB: &str = "https://li/bob";
const CAROL: &str = "https://li/carol";
const ME: &str = "https://li/me";

fn me() -> Identity {
    Identity::new("Me", ME)
}

fn sent(to_name: &str, to_url: &str, date: &str, time: &str) -> MessageRecord {
    message("Me", ME, to_name, to_url, date, time)
}

fn received(from_name: &str, from_url: &str, date: &str, time: &str) -> MessageRecord {
    message(from_name, from_url, "", "", date, time)
}

fn sample_log() -> Vec<MessageRecord> {
    vec![
        sent("Alice", ALICE, "2024-01-01", "09:00"),
        received("Alice", ALICE, "2024-01-01", "09:05"),
        received("Bob", BOB, "2024-01-02", "11:00"),
        sent("Bob", BOB, "2024-01-02", "11:30"),
        sent("Bob", BOB, "2024-01-03", "08:00"),
        sent("Carol", CAROL, "2024-01-03", "12:00"),
    ]
}

#[test]
fn test_alice_scenario() {
    let rows = vec![
        sent("Alice", ALICE, "2024-01-01", "09:00"),
        received("Alice", ALICE, "2024-01-01", "09:05"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);

    assert_eq!(contacts.len(), 1);
    let alice = contacts.get(ALICE).expect("Alice thread");
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.sent_count, 1);
    assert_eq!(alice.received_count, 1);
    assert_eq!(alice.messages.len(), 2);
    assert_eq!(alice.last_contact.as_deref(), Some("2024-01-01 09:05"));
}

#[test]
fn test_reconcile_is_idempotent() {
    let rows = sample_log();
    for policy in [LastContactPolicy::LastSeenInOrder, LastContactPolicy::MaxParsedTimestamp] {
        let first = get_contact_info(&rows, &me(), policy);
        let second = get_contact_info(&rows, &me(), policy);
        assert_eq!(first, second);
    }
}

#[test]
fn test_count_invariant_holds_for_every_thread() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);
    assert!(!contacts.is_empty());
    for thread in &contacts {
        assert_eq!(thread.sent_count + thread.received_count, thread.messages.len());
    }
}

#[test]
fn test_all_self_input_yields_no_threads() {
    let rows = vec![
        sent("Alice", ALICE, "2024-01-01", "09:00"),
        sent("Bob", BOB, "2024-01-01", "10:00"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);
    assert!(contacts.is_empty());
}

#[test]
fn test_empty_input() {
    let contacts = get_contact_info(&[], &me(), LastContactPolicy::LastSeenInOrder);
    assert!(contacts.is_empty());
    assert_eq!(contacts.len(), 0);
}

#[test]
fn test_orphan_self_messages_are_dropped() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);

    // Carol never wrote back
    assert!(!contacts.contains(CAROL));
    assert_eq!(contacts.len(), 2);

    // Self-authored row with no lead URL
    let rows = vec![
        received("Alice", ALICE, "2024-01-01", "09:05"),
        sent("Alice", "", "2024-01-01", "09:10"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);
    assert_eq!(contacts.get(ALICE).map(|t| t.messages.len()), Some(1));
}

#[test]
fn test_messages_before_first_reply_are_kept() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);
    let alice = contacts.get(ALICE).expect("Alice thread");
    assert_eq!(alice.messages[0].sender_name, "Me");
    assert_eq!(alice.messages[1].sender_name, "Alice");
}

#[test]
fn test_no_thread_for_myself() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);
    assert!(!contacts.contains(ME));
    assert!(contacts.iter().all(|t| t.name != "Me"));
}

#[test]
fn test_threads_keep_first_seen_order() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);
    let urls: Vec<&str> = contacts.urls().collect();
    assert_eq!(urls, vec![ALICE, BOB]);
}

#[test]
fn test_last_seen_in_order_ignores_chronology() {
    let rows = vec![
        received("Alice", ALICE, "2024-01-01", "10:00"),
        received("Alice", ALICE, "2023-12-31", "09:00"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);
    assert_eq!(
        contacts.get(ALICE).and_then(|t| t.last_contact.as_deref()),
        Some("2023-12-31 09:00")
    );
}

#[test]
fn test_max_parsed_timestamp_picks_latest() {
    let rows = vec![
        received("Alice", ALICE, "2024-01-01", "10:00"),
        received("Alice", ALICE, "2023-12-31", "09:00"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::MaxParsedTimestamp);
    assert_eq!(
        contacts.get(ALICE).and_then(|t| t.last_contact.as_deref()),
        Some("2024-01-01 10:00")
    );
}

#[test]
fn test_max_parsed_timestamp_skips_unparseable_rows() {
    let rows = vec![
        received("Alice", ALICE, "2024-01-01", "10:00"),
        received("Alice", ALICE, "", ""),
        received("Bob", BOB, "someday", ""),
        received("Bob", BOB, "", "later"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::MaxParsedTimestamp);

    assert_eq!(
        contacts.get(ALICE).and_then(|t| t.last_contact.as_deref()),
        Some("2024-01-01 10:00")
    );
    // Nothing parses: fall back to the last row seen
    assert_eq!(
        contacts.get(BOB).and_then(|t| t.last_contact.as_deref()),
        Some(" later")
    );
}

#[test]
fn test_policies_only_differ_in_last_contact() {
    let rows = sample_log();
    let in_order = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);
    let by_time = get_contact_info(&rows, &me(), LastContactPolicy::MaxParsedTimestamp);

    for (a, b) in in_order.iter().zip(by_time.iter()) {
        assert_eq!(a.url, b.url);
        assert_eq!(a.messages, b.messages);
        assert_eq!(a.sent_count, b.sent_count);
    }
}

#[test]
fn test_counterparty_falls_back_to_lead_columns() {
    // Inbound row exported without sender columns
    let rows = vec![message("", "", "Dora", "https://li/dora", "2024-02-01", "08:00")];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);

    let dora = contacts.get("https://li/dora").expect("Dora thread");
    assert_eq!(dora.name, "Dora");
    assert_eq!(dora.received_count, 1);
}

#[test]
fn test_first_seen_name_is_kept() {
    let rows = vec![
        received("Alice", ALICE, "2024-01-01", "09:00"),
        received("Alice J.", ALICE, "2024-01-02", "09:00"),
    ];
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);
    assert_eq!(contacts.get(ALICE).map(|t| t.name.as_str()), Some("Alice"));
}

#[test]
fn test_numeric_sender_keeps_its_thread_with_empty_self_name() {
    let rows = MessageRecord::from_rows(&[super::fixtures::row(serde_json::json!({
        "sender_name": 42,
        "sender_linkedin_url": ALICE,
        "date": "2024-01-01",
        "time": "09:00",
    }))]);
    let contacts = get_contact_info(&rows, &Identity::new("", ME), LastContactPolicy::LastSeenInOrder);

    let thread = contacts.get(ALICE).expect("thread for the numeric sender");
    assert_eq!(thread.received_count, 1);
    assert_eq!(thread.sent_count, 0);
}

#[test]
fn test_sorting_contacts() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);

    let by_messages: Vec<&str> = contacts
        .sorted_by(ContactSort::Messages)
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(by_messages, vec!["Bob", "Alice"]);

    let by_name: Vec<&str> = contacts
        .sorted_by(ContactSort::Name)
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(by_name, vec!["Alice", "Bob"]);

    let recent: Vec<&str> = contacts
        .sorted_by(ContactSort::Recent)
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(recent, vec!["Bob", "Alice"]);
}

#[test]
fn test_find_and_filter_by_name() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);

    assert_eq!(contacts.find_by_name("Bob").map(|t| t.url.as_str()), Some(BOB));
    assert!(contacts.find_by_name("bob").is_none());
    assert_eq!(contacts.filter_by_name("AL").len(), 1);
    assert_eq!(contacts.filter_by_name("").len(), 2);
}

#[test]
fn test_search_filters_then_sorts() {
    let contacts = get_contact_info(&sample_log(), &me(), LastContactPolicy::LastSeenInOrder);

    let names = |threads: Vec<&crate::ConversationThread>| -> Vec<String> {
        threads.iter().map(|t| t.name.clone()).collect()
    };
    assert_eq!(names(contacts.search("", ContactSort::Messages)), vec!["Bob", "Alice"]);
    assert_eq!(names(contacts.search("", ContactSort::Name)), vec!["Alice", "Bob"]);
    assert_eq!(names(contacts.search("ALI", ContactSort::Messages)), vec!["Alice"]);
    assert!(contacts.search("zed", ContactSort::Name).is_empty());
}

#[test]
fn test_conversation_stats() {
    let rows = sample_log();
    let contacts = get_contact_info(&rows, &me(), LastContactPolicy::LastSeenInOrder);
    let stats = ConversationStats::compute(&rows, &me(), &contacts);

    assert_eq!(stats.total_messages, 6);
    assert_eq!(stats.sent_by_me, 4);
    assert_eq!(stats.received, 2);
    assert_eq!(stats.contacts, 2);
    assert_eq!(stats.active_days, 3);
}
