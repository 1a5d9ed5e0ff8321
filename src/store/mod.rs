//! Record store trait and implementations.
//!
//! | Store | Feature Flag | `STORE_URI` |
//! |-------|-------------|-------------|
//! | [`MemoryStore`] | (none) | `memory://` |
//! | [`SqliteStore`] | `sqlite` | `sqlite:<path>`, `sqlite::memory:` |

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::record::EmailRecord;

mod memory;
pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Append-only persistence for email records.
///
/// Implementations must be safe to call concurrently; the pipeline holds
/// no lock around them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist `record` and return the identifier assigned to it.
    ///
    /// `record.id` is ignored.
    async fn insert(&self, record: &EmailRecord) -> Result<String, StoreError>;

    /// Every stored record, in the store's natural scan order.
    async fn find_all(&self) -> Result<Vec<EmailRecord>, StoreError>;

    /// Get the store name (for logging).
    fn store_name(&self) -> &'static str {
        "unknown"
    }
}

/// Namespaces end up in SQL identifiers, so keep them to `[A-Za-z0-9_]`.
pub(crate) fn validate_namespace(namespace: &str) -> Result<(), StoreError> {
    let valid = !namespace.is_empty()
        && !namespace.starts_with(|c: char| c.is_ascii_digit())
        && namespace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Configuration(format!(
            "invalid namespace {:?}: use letters, digits and underscores",
            namespace
        )))
    }
}

/// Open the store named by `config.uri`.
pub async fn connect(config: StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    validate_namespace(&config.namespace)?;

    if config.uri == "memory://" {
        tracing::warn!(
            namespace = %config.namespace,
            "Using in-memory record store; records are lost on restart"
        );
        return Ok(Arc::new(MemoryStore::new()));
    }

    if config.uri.starts_with("sqlite:") {
        #[cfg(feature = "sqlite")]
        {
            let store = SqliteStore::connect(&config.uri, &config.namespace).await?;
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "sqlite"))]
        return Err(StoreError::Configuration(
            "STORE_URI=sqlite:... but 'sqlite' feature is not enabled. \
            Add `features = [\"sqlite\"]` to Cargo.toml"
                .into(),
        ));
    }

    Err(StoreError::Configuration(format!(
        "unsupported STORE_URI {:?}: use memory:// or sqlite:<path>",
        config.uri
    )))
}
