//! SMTP transport using lettre.
//!
//! # Example
//!
//! ```rust,ignore
//! use mailrecord::providers::SmtpTransport;
//!
//! // With authentication
//! let transport = SmtpTransport::new("smtp.example.com", 587, "noreply@example.com")
//!     .credentials("username", "password")
//!     .build()?;
//!
//! // Without authentication (local relay)
//! let transport = SmtpTransport::localhost("noreply@localhost")?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::check_subject;
use crate::config::TlsMode;
use crate::error::TransportError;
use crate::transport::{DeliveryResult, Transport};

/// SMTP mail transport.
///
/// Each send opens a session, authenticates if credentials were given,
/// transmits and closes.
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    /// Create a new SMTP transport builder with STARTTLS (port 587).
    pub fn new(host: &str, port: u16, from: &str) -> SmtpBuilder {
        SmtpBuilder {
            host: host.to_string(),
            port,
            from: from.to_string(),
            credentials: None,
            tls: TlsMode::StartTls,
            timeout: None,
        }
    }

    /// Create a new SMTP transport for localhost (no TLS, no auth).
    pub fn localhost(from: &str) -> Result<Self, TransportError> {
        SmtpTransport::new("localhost", 25, from).no_tls().build()
    }

    /// Build a lettre Message. The body is sent as UTF-8 HTML.
    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, TransportError> {
        check_subject(subject)?;
        let to: Mailbox = to.parse()?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())?;

        Ok(message)
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<DeliveryResult, TransportError> {
        let message = self.build_message(to, subject, body)?;

        let response = self.transport.send(message).await?;

        // Extract message ID from SMTP response, or generate one
        let message_id = response
            .message()
            .next()
            .and_then(|m| m.lines().next())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        tracing::debug!(message_id = %message_id, code = %response.code(), "SMTP server accepted message");

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}

/// Builder for SmtpTransport.
pub struct SmtpBuilder {
    host: String,
    port: u16,
    from: String,
    credentials: Option<Credentials>,
    tls: TlsMode,
    timeout: Option<Duration>,
}

impl SmtpBuilder {
    /// Set SMTP credentials.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username.to_string(), password.to_string()));
        self
    }

    /// Set TLS mode.
    pub fn tls(mut self, mode: TlsMode) -> Self {
        self.tls = mode;
        self
    }

    /// Disable TLS (dangerous, only for localhost/testing).
    pub fn no_tls(mut self) -> Self {
        self.tls = TlsMode::None;
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the SmtpTransport.
    ///
    /// Fails if the sender address cannot be parsed or the TLS relay
    /// cannot be set up for `host`.
    pub fn build(self) -> Result<SmtpTransport, TransportError> {
        let from: Mailbox = self.from.parse().map_err(|e: lettre::address::AddressError| {
            TransportError::Configuration(format!("invalid sender {:?}: {}", self.from, e))
        })?;

        let builder = match self.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| TransportError::Configuration(e.to_string()))?,
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| TransportError::Configuration(e.to_string()))?,
        };

        let mut builder = builder.port(self.port).timeout(self.timeout);
        if let Some(creds) = self.credentials {
            builder = builder.credentials(creds);
        }

        Ok(SmtpTransport {
            transport: builder.build(),
            from,
        })
    }
}
