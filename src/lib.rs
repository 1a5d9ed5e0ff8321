//! # mailrecord
//!
//! Send an email through a pluggable transport, then record it in a
//! persistent log.
//!
//! ## Quick Start
//!
//! Set environment variables:
//! ```bash
//! TRANSPORT_PROVIDER=smtp
//! TRANSPORT_HOST=smtp.example.com
//! TRANSPORT_USERNAME=apikey
//! TRANSPORT_PASSWORD=secret
//! TRANSPORT_FROM_ADDRESS=noreply@example.com
//! STORE_URI=sqlite:mail.db
//! ```
//!
//! Build the pipeline and serve it:
//! ```rust,ignore
//! use mailrecord::{providers, server, store, Config, EmailPipeline};
//!
//! let config = Config::from_env()?;
//! let transport = providers::from_config(config.transport)?;
//! let store = store::connect(config.store).await?;
//! let app = server::router(EmailPipeline::new(transport, store));
//! ```
//!
//! Or drive the pipeline directly:
//! ```rust,ignore
//! use mailrecord::NewEmail;
//!
//! let record = pipeline.create(NewEmail::new("user@example.com", "Welcome!", "<p>Hello</p>")).await?;
//! let all = pipeline.list_all().await?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `TRANSPORT_PROVIDER` | `smtp` (default), `amazon_ses`, `logger`, `local` |
//! | `TRANSPORT_HOST` | SMTP relay host, or SES endpoint override |
//! | `TRANSPORT_PORT` | SMTP port (default: 587) |
//! | `TRANSPORT_USERNAME` | SMTP username, or AWS access key id |
//! | `TRANSPORT_PASSWORD` | SMTP password, or AWS secret key |
//! | `TRANSPORT_FROM_ADDRESS` | Sender address |
//! | `TRANSPORT_TLS` | `starttls` (default), `tls`, `none` |
//! | `TRANSPORT_REGION` | AWS region for SES (default: us-west-2) |
//! | `TRANSPORT_TIMEOUT_SECS` | Transport timeout (default: 10) |
//! | `STORE_URI` | `sqlite:<path>` (default: `sqlite:mailrecord.db`), `memory://` |
//! | `STORE_NAMESPACE` | Collection/table name (default: emails) |
//! | `LISTEN_ADDR` | HTTP listen address (default: 0.0.0.0:8000) |
//! | `LOG_LEVEL` | Log filter when `RUST_LOG` is unset (default: info) |
//!
//! ## Feature Flags
//!
//! - `smtp` - SMTP transport via lettre
//! - `amazon_ses` - Amazon SES API transport
//! - `sqlite` - SQLite record store via sqlx
//! - `local` - LocalTransport and test assertions
//! - `server` - axum HTTP API and the `mailrecord` binary
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//!
//! ## Metrics
//!
//! With the `metrics` feature enabled:
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `mailrecord_create_total` | Counter | provider, status |
//! | `mailrecord_send_duration_seconds` | Histogram | provider |
//! | `mailrecord_unrecorded_deliveries_total` | Counter | provider |
//!
//! `status` is `success`, `validation`, `transport` or `store`.

/// The version of the mailrecord crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod error;
mod pipeline;
mod record;
mod transport;

pub mod providers;
pub mod store;

#[cfg(feature = "local")]
pub mod testing;

#[cfg(feature = "server")]
pub mod server;

// Re-exports
pub use config::{Config, StoreConfig, TlsMode, TransportConfig, TransportKind};
pub use error::{ConfigError, PipelineError, StoreError, TransportError, ValidationError};
pub use pipeline::EmailPipeline;
pub use record::{EmailRecord, NewEmail};
pub use store::{MemoryStore, RecordStore};
pub use transport::{DeliveryResult, Transport};

/// Prelude for convenient imports.
///
/// ```rust
/// use mailrecord::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Config, DeliveryResult, EmailPipeline, EmailRecord, NewEmail, PipelineError, RecordStore,
        StoreError, Transport, TransportError,
    };

    #[cfg(feature = "local")]
    pub use crate::providers::LocalTransport;
}
