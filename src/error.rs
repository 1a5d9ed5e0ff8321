//! Error types for mailrecord.
//!
//! Each stage of the pipeline has its own error type so a delivery failure
//! can always be told apart from a logging failure.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::Transport) while sending.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Transport is misconfigured (missing sender, bad endpoint, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The transport rejected an address while building the message.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Error building the outgoing message.
    #[error("Build error: {0}")]
    Build(String),

    /// Error during the send handshake (auth, recipient rejected, network).
    #[error("Send error: {0}")]
    Send(String),

    /// Provider API returned an error response.
    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: &'static str,
        message: String,
        /// Optional HTTP status code
        status: Option<u16>,
    },

    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl TransportError {
    /// Create a provider error with HTTP status.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            status: Some(status),
        }
    }
}

#[cfg(feature = "_http")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

#[cfg(any(feature = "smtp", feature = "amazon_ses"))]
impl From<lettre::error::Error> for TransportError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Build(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::transport::smtp::Error> for TransportError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::Send(err.to_string())
    }
}

#[cfg(any(feature = "smtp", feature = "amazon_ses"))]
impl From<lettre::address::AddressError> for TransportError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

/// Errors raised by a [`RecordStore`](crate::RecordStore).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store is misconfigured (bad URI, bad namespace).
    #[error("Store configuration error: {0}")]
    Configuration(String),

    /// Could not reach the store.
    #[error("Store connection error: {0}")]
    Connection(String),

    /// A read or write was rejected or timed out.
    #[error("Store query error: {0}")]
    Query(String),

    /// A stored row could not be converted to or from a record.
    #[error("Store serialization error: {0}")]
    Serialization(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Serialization(err.to_string())
            }
            other => Self::Query(other.to_string()),
        }
    }
}

/// Malformed creation request, rejected before any external call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Error returned by [`EmailPipeline::create`](crate::EmailPipeline::create).
///
/// The variant names the stage that failed. `Store` after a successful send
/// means the email was delivered but not recorded.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Name of the failing stage, for logs and error bodies.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::Store(_) => "store",
        }
    }
}

/// Errors resolving [`Config`](crate::Config) at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required option is not set.
    #[error("Missing configuration: {0} not set")]
    Missing(&'static str),

    /// An option is set but cannot be parsed.
    #[error("Invalid configuration: {key}={value:?}")]
    Invalid { key: &'static str, value: String },

    /// `TRANSPORT_PROVIDER` names a provider this build does not know.
    #[error("Unknown TRANSPORT_PROVIDER: {0}. Valid providers are: smtp, amazon_ses, logger, local")]
    UnknownProvider(String),
}
