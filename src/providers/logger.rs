//! Logger transport that only logs messages.
//!
//! Useful for staging environments or when you want to see what would be sent
//! without contacting a mail server. Every send succeeds.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::transport::{DeliveryResult, Transport};

/// Logger transport that emits tracing events instead of sending.
pub struct LoggerTransport {
    /// If true, log the body at debug level as well.
    log_full: bool,
}

impl LoggerTransport {
    /// Create a logger transport with brief output.
    pub fn new() -> Self {
        Self { log_full: false }
    }

    /// Create a logger transport that also logs bodies.
    pub fn full() -> Self {
        Self { log_full: true }
    }
}

impl Default for LoggerTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for LoggerTransport {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<DeliveryResult, TransportError> {
        let message_id = uuid::Uuid::new_v4().to_string();

        tracing::info!(
            message_id = %message_id,
            to = %to,
            subject = %subject,
            body_len = body.len(),
            "Email logged"
        );
        if self.log_full {
            tracing::debug!(body = %body, "Email body");
        }

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "logger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logger_always_succeeds() {
        let transport = LoggerTransport::new();

        let delivery = transport.send("a@x.com", "", "").await.unwrap();
        assert!(!delivery.message_id.is_empty());

        let full = LoggerTransport::full();
        assert!(full.log_full);
        assert!(full.send("not an address", "Hi", "Body").await.is_ok());
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(LoggerTransport::default().provider_name(), "logger");
    }
}
