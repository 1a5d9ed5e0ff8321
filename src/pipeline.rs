//! Dispatch-then-record pipeline.
//!
//! `create` sends first and persists second, in that order and never
//! concurrently. A record is written only for an email whose send
//! succeeded, and the send is attempted at most once per request.
//!
//! If the insert fails after a successful send, the email has gone out
//! but the log has no entry for it. That state is returned as
//! [`PipelineError::Store`], logged at `error` with the provider message id,
//! and (with the `metrics` feature) counted in
//! `mailrecord_unrecorded_deliveries_total`. Nothing retries or compensates;
//! resubmitting the request sends the email again.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use std::time::Instant;

use chrono::Utc;
use tracing::Instrument;

use crate::error::{PipelineError, StoreError};
use crate::record::{EmailRecord, NewEmail};
use crate::store::RecordStore;
use crate::transport::Transport;

/// Orchestrates the send and the record for each request.
///
/// Cheap to clone; clones share the transport and store.
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use mailrecord::{EmailPipeline, MemoryStore, NewEmail};
/// use mailrecord::providers::LocalTransport;
///
/// let pipeline = EmailPipeline::new(Arc::new(LocalTransport::new()), MemoryStore::shared());
/// let record = pipeline.create(NewEmail::new("a@x.com", "Hi", "Body")).await?;
/// assert!(record.id.is_some());
/// ```
#[derive(Clone)]
pub struct EmailPipeline {
    transport: Arc<dyn Transport>,
    store: Arc<dyn RecordStore>,
}

impl EmailPipeline {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn RecordStore>) -> Self {
        Self { transport, store }
    }

    /// Name of the active transport.
    pub fn provider_name(&self) -> &'static str {
        self.transport.provider_name()
    }

    /// Send `email`, then persist it.
    ///
    /// Returns the stored record with its assigned `id` and `created`
    /// timestamp, or the error of the stage that failed.
    pub async fn create(&self, email: NewEmail) -> Result<EmailRecord, PipelineError> {
        let provider = self.transport.provider_name();
        let span = tracing::info_span!(
            "mailrecord.create",
            provider = provider,
            to = %email.to,
            subject = %email.subject,
        );

        let result = self.create_inner(email).instrument(span.clone()).await;

        #[cfg(feature = "metrics")]
        {
            let status = match &result {
                Ok(_) => "success",
                Err(e) => e.stage(),
            };
            metrics::counter!("mailrecord_create_total", "provider" => provider, "status" => status)
                .increment(1);
        }

        span.in_scope(|| match &result {
            Ok(record) => tracing::info!(id = ?record.id, "Email sent and recorded"),
            Err(PipelineError::Validation(e)) => {
                tracing::warn!(stage = "validation", error = %e, "Email request rejected")
            }
            Err(PipelineError::Transport(e)) => {
                tracing::error!(stage = "transport", error = %e, "Email delivery failed; nothing recorded")
            }
            // Logged with the message id inside create_inner.
            Err(PipelineError::Store(_)) => {}
        });

        result
    }

    async fn create_inner(&self, email: NewEmail) -> Result<EmailRecord, PipelineError> {
        email.validate()?;

        tracing::debug!("Dispatching email");

        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let delivery = self
            .transport
            .send(&email.to, &email.subject, &email.message)
            .await;

        #[cfg(feature = "metrics")]
        metrics::histogram!("mailrecord_send_duration_seconds", "provider" => self.transport.provider_name())
            .record(start.elapsed().as_secs_f64());

        let delivery = delivery?;
        tracing::debug!(message_id = %delivery.message_id, "Email delivered; recording");

        let record = EmailRecord::unsaved(email, Utc::now());

        match self.store.insert(&record).await {
            Ok(id) => Ok(record.with_id(id)),
            Err(e) => {
                tracing::error!(
                    stage = "store",
                    store = self.store.store_name(),
                    message_id = %delivery.message_id,
                    to = %record.to,
                    subject = %record.subject,
                    created = %record.created.to_rfc3339(),
                    error = %e,
                    "Email delivered but not recorded; reconcile manually"
                );

                #[cfg(feature = "metrics")]
                metrics::counter!("mailrecord_unrecorded_deliveries_total", "provider" => self.transport.provider_name())
                    .increment(1);

                Err(e.into())
            }
        }
    }

    /// Every record in the store. Never touches the transport.
    pub async fn list_all(&self) -> Result<Vec<EmailRecord>, StoreError> {
        let result = self.store.find_all().await;
        if let Err(ref e) = result {
            tracing::error!(stage = "store", store = self.store.store_name(), error = %e, "Listing records failed");
        }
        result
    }
}
