//! Process configuration, resolved once at startup.
//!
//! Nothing in the request path reads the environment. [`Config`] is built
//! in `main` and its parts are handed by value to
//! [`providers::from_config`](crate::providers::from_config) and
//! [`store::connect`](crate::store::connect).
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TRANSPORT_PROVIDER` | `smtp` | `smtp`, `amazon_ses`, `logger`, `local` |
//! | `TRANSPORT_HOST` | | SMTP host / SES endpoint override |
//! | `TRANSPORT_PORT` | `587` | SMTP port |
//! | `TRANSPORT_USERNAME` | | SMTP user / AWS access key id |
//! | `TRANSPORT_PASSWORD` | | SMTP password / AWS secret key |
//! | `TRANSPORT_FROM_ADDRESS` | | Sender address |
//! | `TRANSPORT_TLS` | `starttls` | `starttls`, `tls`, `none` |
//! | `TRANSPORT_REGION` | `us-west-2` | SES region |
//! | `TRANSPORT_TIMEOUT_SECS` | `10` | Transport client timeout |
//! | `STORE_URI` | `sqlite:mailrecord.db` | `sqlite:<path>`, `sqlite::memory:`, `memory://` |
//! | `STORE_NAMESPACE` | `emails` | Table / collection name |
//! | `LISTEN_ADDR` | `0.0.0.0:8000` | HTTP bind address |
//! | `LOG_LEVEL` | `info` | Log level when `RUST_LOG` is unset |

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_REGION: &str = "us-west-2";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
#[cfg(feature = "sqlite")]
const DEFAULT_STORE_URI: &str = "sqlite:mailrecord.db";
#[cfg(not(feature = "sqlite"))]
const DEFAULT_STORE_URI: &str = "memory://";
const DEFAULT_NAMESPACE: &str = "emails";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Which transport strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Smtp,
    AmazonSes,
    Logger,
    Local,
}

impl TransportKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "amazon_ses" | "ses" => Ok(Self::AmazonSes),
            "logger" => Ok(Self::Logger),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::AmazonSes => "amazon_ses",
            Self::Logger => "logger",
            Self::Local => "local",
        }
    }
}

/// TLS mode for SMTP connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// No TLS (dangerous, only for localhost)
    None,
    /// STARTTLS - upgrade to TLS after connecting (port 587)
    StartTls,
    /// Implicit TLS - connect with TLS from start (port 465)
    Tls,
}

impl TlsMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "starttls" => Ok(Self::StartTls),
            "tls" => Ok(Self::Tls),
            _ => Err(ConfigError::Invalid {
                key: "TRANSPORT_TLS",
                value: value.to_string(),
            }),
        }
    }
}

/// Transport endpoint, credentials and sender identity.
#[derive(Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub kind: TransportKind,
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
    pub tls: TlsMode,
    pub region: String,
    pub timeout: Duration,
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportConfig")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from_address", &self.from_address)
            .field("tls", &self.tls)
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TransportConfig {
    /// A local capture transport, for tests and development.
    pub fn local() -> Self {
        Self {
            kind: TransportKind::Local,
            host: None,
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            from_address: None,
            tls: TlsMode::StartTls,
            region: DEFAULT_REGION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sender address, required by the real transports.
    pub fn require_from(&self) -> Result<&str, ConfigError> {
        self.from_address
            .as_deref()
            .ok_or(ConfigError::Missing("TRANSPORT_FROM_ADDRESS"))
    }
}

/// Store connection string and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_STORE_URI.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Full process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub transport: TransportConfig,
    pub store: StoreConfig,
    pub listen_addr: String,
    pub log_level: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let kind = match get("TRANSPORT_PROVIDER") {
            Some(p) => TransportKind::parse(&p)?,
            None => TransportKind::Smtp,
        };

        let port = match get("TRANSPORT_PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid {
                key: "TRANSPORT_PORT",
                value: p,
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let timeout_secs = match get("TRANSPORT_TIMEOUT_SECS") {
            Some(t) => t.parse().map_err(|_| ConfigError::Invalid {
                key: "TRANSPORT_TIMEOUT_SECS",
                value: t,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let tls = match get("TRANSPORT_TLS") {
            Some(t) => TlsMode::parse(&t)?,
            None => TlsMode::StartTls,
        };

        let transport = TransportConfig {
            kind,
            host: get("TRANSPORT_HOST"),
            port,
            username: get("TRANSPORT_USERNAME"),
            password: get("TRANSPORT_PASSWORD"),
            from_address: get("TRANSPORT_FROM_ADDRESS"),
            tls,
            region: get("TRANSPORT_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        match transport.kind {
            TransportKind::Smtp => {
                if transport.host.is_none() {
                    return Err(ConfigError::Missing("TRANSPORT_HOST"));
                }
                transport.require_from()?;
            }
            TransportKind::AmazonSes => {
                if transport.username.is_none() {
                    return Err(ConfigError::Missing("TRANSPORT_USERNAME"));
                }
                if transport.password.is_none() {
                    return Err(ConfigError::Missing("TRANSPORT_PASSWORD"));
                }
                transport.require_from()?;
            }
            TransportKind::Logger | TransportKind::Local => {}
        }

        let store = StoreConfig {
            uri: get("STORE_URI").unwrap_or_else(|| DEFAULT_STORE_URI.to_string()),
            namespace: get("STORE_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        };

        Ok(Self {
            transport,
            store,
            listen_addr: get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}
