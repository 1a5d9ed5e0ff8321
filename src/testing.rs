//! Testing utilities and assertion helpers for [`LocalTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use mailrecord::providers::LocalTransport;
//! use mailrecord::testing::*;
//!
//! #[tokio::test]
//! async fn test_welcome_flow() {
//!     let transport = LocalTransport::new();
//!
//!     // ... trigger email sending ...
//!
//!     assert_sent_count(&transport, 1);
//!     assert_sent_to(&transport, "user@example.com");
//!     assert_subject_matches(&transport, r"Welcome.*!");
//! }
//! ```

use regex::Regex;

use crate::providers::{LocalTransport, SentMessage};

/// Format a list of messages for panic messages.
fn format_summary(messages: &[SentMessage]) -> String {
    if messages.is_empty() {
        return "  (no emails sent)".to_string();
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("  {}. To: {}, Subject: \"{}\"", i + 1, m.to, m.subject))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that no emails were sent.
///
/// # Panics
///
/// Panics if any email was sent.
pub fn assert_nothing_sent(transport: &LocalTransport) {
    let messages = transport.messages();
    assert!(
        messages.is_empty(),
        "Expected no emails to be sent, but {} were sent.\n\nEmails sent:\n{}",
        messages.len(),
        format_summary(&messages)
    );
}

/// Assert that exactly `expected` emails were sent.
///
/// # Panics
///
/// Panics if the count doesn't match.
pub fn assert_sent_count(transport: &LocalTransport, expected: usize) {
    let messages = transport.messages();
    assert!(
        messages.len() == expected,
        "Expected {} email(s) to be sent, but {} were sent.\n\nEmails sent:\n{}",
        expected,
        messages.len(),
        format_summary(&messages)
    );
}

/// Assert that an email was sent to `address` (case-insensitive).
///
/// # Panics
///
/// Panics if no email was sent to the address.
pub fn assert_sent_to(transport: &LocalTransport, address: &str) {
    assert!(
        transport.sent_to(address),
        "Expected an email to be sent to '{}'.\n\nEmails sent:\n{}",
        address,
        format_summary(&transport.messages())
    );
}

/// Assert that some sent email's subject matches `pattern`.
///
/// # Panics
///
/// Panics if the pattern is invalid or nothing matches.
pub fn assert_subject_matches(transport: &LocalTransport, pattern: &str) {
    let re = Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid regex '{}': {}", pattern, e));
    let messages = transport.messages();
    assert!(
        messages.iter().any(|m| re.is_match(&m.subject)),
        "Expected an email with subject matching /{}/.\n\nEmails sent:\n{}",
        pattern,
        format_summary(&messages)
    );
}
