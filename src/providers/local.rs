//! Local transport for development and testing.
//!
//! Captures messages in memory instead of sending them, and can be told to
//! fail so error paths can be exercised.
//!
//! # Testing Usage
//!
//! ```rust,ignore
//! use mailrecord::providers::LocalTransport;
//! use mailrecord::testing::*;
//!
//! #[tokio::test]
//! async fn test_sends_welcome_email() {
//!     let transport = LocalTransport::new();
//!
//!     // Code under test
//!     send_welcome_email(&transport, "user@example.com").await;
//!
//!     assert_sent_count(&transport, 1);
//!     assert_sent_to(&transport, "user@example.com");
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::TransportError;
use crate::transport::{DeliveryResult, Transport};

/// A message captured by [`LocalTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    sent: RwLock<Vec<SentMessage>>,
    /// Every call to `send`, including failed ones.
    attempts: RwLock<usize>,
    /// If set, send() will return this error (for testing error paths).
    fail_with: RwLock<Option<String>>,
}

/// Local transport that captures messages in memory.
///
/// Clones share the same capture buffer.
#[derive(Debug, Clone, Default)]
pub struct LocalTransport {
    inner: Arc<Inner>,
}

impl LocalTransport {
    /// Create a new local transport with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a local transport that fails every send with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.set_failure(message);
        transport
    }

    // =========================================================================
    // Failure Simulation (for testing)
    // =========================================================================

    /// Configure the transport to fail with an error message.
    pub fn set_failure(&self, message: impl Into<String>) {
        *self.inner.fail_with.write() = Some(message.into());
    }

    /// Clear the failure state.
    pub fn clear_failure(&self) {
        *self.inner.fail_with.write() = None;
    }

    // =========================================================================
    // Message Access (for testing assertions)
    // =========================================================================

    /// All captured messages, oldest first.
    pub fn messages(&self) -> Vec<SentMessage> {
        self.inner.sent.read().clone()
    }

    /// The most recently captured message.
    pub fn last_message(&self) -> Option<SentMessage> {
        self.inner.sent.read().last().cloned()
    }

    /// Number of successfully captured messages.
    pub fn sent_count(&self) -> usize {
        self.inner.sent.read().len()
    }

    /// Number of `send` calls, successful or not.
    pub fn attempt_count(&self) -> usize {
        *self.inner.attempts.read()
    }

    /// Check if a message was sent to a specific address.
    pub fn sent_to(&self, address: &str) -> bool {
        self.inner
            .sent
            .read()
            .iter()
            .any(|m| m.to.eq_ignore_ascii_case(address))
    }

    /// Remove and return all captured messages.
    pub fn flush(&self) -> Vec<SentMessage> {
        std::mem::take(&mut *self.inner.sent.write())
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<DeliveryResult, TransportError> {
        *self.inner.attempts.write() += 1;

        if let Some(ref message) = *self.inner.fail_with.read() {
            return Err(TransportError::Send(message.clone()));
        }

        let message_id = uuid::Uuid::new_v4().to_string();
        self.inner.sent.write().push(SentMessage {
            message_id: message_id.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
        });

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_transport_captures() {
        let transport = LocalTransport::new();

        let result = transport.send("a@x.com", "Hi", "Body").await.unwrap();
        assert!(!result.message_id.is_empty());

        let last = transport.last_message().unwrap();
        assert_eq!(last.message_id, result.message_id);
        assert_eq!(last.subject, "Hi");
        assert!(transport.sent_to("A@X.COM"));
    }

    #[tokio::test]
    async fn test_can_fail() {
        let transport = LocalTransport::failing("Simulated failure");

        let result = transport.send("a@x.com", "Hi", "Body").await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Simulated failure"));
        assert_eq!(transport.attempt_count(), 1);
        assert_eq!(transport.sent_count(), 0);

        transport.clear_failure();
        assert!(transport.send("a@x.com", "Hi", "Body").await.is_ok());
        assert_eq!(transport.attempt_count(), 2);
    }

    #[tokio::test]
    async fn test_clone_shares_buffer() {
        let transport = LocalTransport::new();
        let cloned = transport.clone();

        cloned.send("a@x.com", "Hi", "Body").await.unwrap();
        assert_eq!(transport.sent_count(), 1);

        assert_eq!(transport.flush().len(), 1);
        assert_eq!(cloned.sent_count(), 0);
    }
}
