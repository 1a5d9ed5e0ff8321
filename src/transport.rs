//! Transport trait and delivery result types.
//!
//! # Why `async_trait`?
//!
//! The pipeline holds its transport as `Arc<dyn Transport>` so the provider
//! can be picked from configuration at startup. Native async trait methods
//! are not object-safe, so `#[async_trait]` boxes the future. Sending is
//! network-bound and the allocation is not measurable next to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Message ID assigned by the provider
    pub message_id: String,
}

impl DeliveryResult {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}

/// A mail transport: the one capability the pipeline needs from the
/// outside world.
///
/// Implementations perform no validation of their own beyond what the
/// underlying protocol requires. A call either completes the delivery
/// handshake or returns an error; there is no partial success.
///
/// # Example
///
/// ```rust,ignore
/// use mailrecord::Transport;
/// use mailrecord::providers::SmtpTransport;
///
/// let transport = SmtpTransport::new("smtp.example.com", 587, "noreply@example.com")
///     .credentials("user", "pass")
///     .build()?;
///
/// let result = transport.send("a@example.com", "Hi", "<p>Hello</p>").await?;
/// println!("Sent with ID: {}", result.message_id);
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one message. Called at most once per pipeline request.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<DeliveryResult, TransportError>;

    /// Get the provider name (for logging/metrics).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }
}
