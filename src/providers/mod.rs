//! Transport implementations.
//!
//! Each provider implements the [`Transport`](crate::Transport) trait.
//! Exactly one is active per process, chosen by [`from_config`].
//!
//! ## Available Providers
//!
//! | Provider | Feature Flag | Description |
//! |----------|-------------|-------------|
//! | [`SmtpTransport`] | `smtp` | SMTP via lettre |
//! | [`AmazonSesTransport`] | `amazon_ses` | Amazon SES API |
//! | [`LocalTransport`] | `local` | In-memory capture for dev/testing |
//! | [`LoggerTransport`] | (none) | Logs messages without sending |

use std::sync::Arc;

use crate::config::{TransportConfig, TransportKind};
use crate::error::TransportError;
use crate::transport::Transport;

#[cfg(feature = "smtp")]
mod smtp;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpBuilder, SmtpTransport};

#[cfg(feature = "amazon_ses")]
mod amazon_ses;
#[cfg(feature = "amazon_ses")]
pub use amazon_ses::AmazonSesTransport;

#[cfg(feature = "local")]
mod local;
#[cfg(feature = "local")]
pub use local::{LocalTransport, SentMessage};

mod logger;
pub use logger::LoggerTransport;

/// Reject subjects that would break out of their header line.
#[cfg(any(feature = "smtp", feature = "amazon_ses"))]
pub(crate) fn check_subject(subject: &str) -> Result<(), TransportError> {
    if subject.contains(['\r', '\n']) {
        return Err(TransportError::Build("subject must not contain line breaks".into()));
    }
    Ok(())
}

/// Build the transport selected by `config`.
///
/// Fails if the provider's feature is not compiled in or its settings are
/// unusable (e.g. an unparseable sender address).
pub fn from_config(config: TransportConfig) -> Result<Arc<dyn Transport>, TransportError> {
    match config.kind {
        #[cfg(feature = "smtp")]
        TransportKind::Smtp => {
            let host = config
                .host
                .as_deref()
                .ok_or_else(|| TransportError::Configuration("TRANSPORT_HOST not set".into()))?;
            let from = config
                .require_from()
                .map_err(|e| TransportError::Configuration(e.to_string()))?;

            let mut builder = SmtpTransport::new(host, config.port, from)
                .tls(config.tls)
                .timeout(config.timeout);
            if let Some(username) = config.username.as_deref() {
                builder = builder.credentials(username, config.password.as_deref().unwrap_or_default());
            }
            Ok(Arc::new(builder.build()?))
        }
        #[cfg(not(feature = "smtp"))]
        TransportKind::Smtp => Err(TransportError::Configuration(
            "TRANSPORT_PROVIDER=smtp but 'smtp' feature is not enabled. \
            Add `features = [\"smtp\"]` to Cargo.toml"
                .into(),
        )),

        #[cfg(feature = "amazon_ses")]
        TransportKind::AmazonSes => {
            let missing = |key: &str| TransportError::Configuration(format!("{} not set", key));
            let access_key = config.username.clone().ok_or_else(|| missing("TRANSPORT_USERNAME"))?;
            let secret = config.password.clone().ok_or_else(|| missing("TRANSPORT_PASSWORD"))?;
            let from = config
                .require_from()
                .map_err(|e| TransportError::Configuration(e.to_string()))?;

            let mut transport = AmazonSesTransport::with_timeout(
                config.region.clone(),
                access_key,
                secret,
                from,
                config.timeout,
            )?;
            if let Some(host) = config.host {
                transport = transport.host(host);
            }
            Ok(Arc::new(transport))
        }
        #[cfg(not(feature = "amazon_ses"))]
        TransportKind::AmazonSes => Err(TransportError::Configuration(
            "TRANSPORT_PROVIDER=amazon_ses but 'amazon_ses' feature is not enabled. \
            Add `features = [\"amazon_ses\"]` to Cargo.toml"
                .into(),
        )),

        #[cfg(feature = "local")]
        TransportKind::Local => Ok(Arc::new(LocalTransport::new())),
        #[cfg(not(feature = "local"))]
        TransportKind::Local => Err(TransportError::Configuration(
            "TRANSPORT_PROVIDER=local but 'local' feature is not enabled. \
            Add `features = [\"local\"]` to Cargo.toml"
                .into(),
        )),

        TransportKind::Logger => Ok(Arc::new(LoggerTransport::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_from_config() {
        let mut config = TransportConfig::local();
        config.kind = TransportKind::Logger;

        let transport = from_config(config).unwrap();
        assert_eq!(transport.provider_name(), "logger");
    }

    #[cfg(feature = "local")]
    #[test]
    fn test_local_from_config() {
        let transport = from_config(TransportConfig::local()).unwrap();
        assert_eq!(transport.provider_name(), "local");
    }

    #[cfg(feature = "smtp")]
    #[test]
    fn test_smtp_from_config() {
        let mut config = TransportConfig::local();
        config.kind = TransportKind::Smtp;
        config.host = Some("localhost".into());
        config.tls = crate::config::TlsMode::None;
        config.from_address = Some("noreply@example.com".into());

        let transport = from_config(config.clone()).unwrap();
        assert_eq!(transport.provider_name(), "smtp");

        config.from_address = None;
        assert!(matches!(
            from_config(config),
            Err(TransportError::Configuration(_))
        ));
    }
}
