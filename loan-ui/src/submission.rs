//! Create-application half of the two-phase protocol.
//!
//! The applicant is moved to the completion view as soon as they pick a
//! product; the record itself is created by a background task. Its identifier
//! lands in an [`ApplicationIdSlot`], which the upload coordinator reads or
//! fills lazily. The slot is initialized at most once, so the background
//! create and a lazy create can never both produce a record.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use loan_core::{ApplicationId, ApplicationPayload, BackendClient, ClientError};
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(10);

/// The create-application call failed. The wizard still advances; upload
/// retries the create lazily.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("application was not created within {0:?}")]
    Timeout(Duration),

    #[error("application could not be created: {0}")]
    Client(#[from] ClientError),
}

/// Write-once holder of the backend-assigned identifier, shared by the
/// submission flow and the upload coordinator.
#[derive(Debug, Clone, Default)]
pub struct ApplicationIdSlot(Arc<OnceCell<ApplicationId>>);

impl ApplicationIdSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ApplicationId> {
        self.0.get().cloned()
    }

    pub fn is_set(&self) -> bool {
        self.0.initialized()
    }

    /// Returns the stored identifier, or creates the application with
    /// `payload` and stores the result.
    ///
    /// Concurrent callers wait for the create already in flight instead of
    /// starting another. A failed create leaves the slot empty.
    pub async fn get_or_create(
        &self,
        client: &dyn BackendClient,
        payload: &ApplicationPayload,
        timeout: Duration,
    ) -> Result<ApplicationId, SubmissionError> {
        self.0
            .get_or_try_init(|| create_application(client, payload, timeout))
            .await
            .cloned()
    }
}

async fn create_application(
    client: &dyn BackendClient,
    payload: &ApplicationPayload,
    timeout: Duration,
) -> Result<ApplicationId, SubmissionError> {
    let created = tokio::time::timeout(timeout, client.create_application(payload))
        .await
        .map_err(|_| SubmissionError::Timeout(timeout))??;

    info!(application_id = %created.application_id, "application created");
    Ok(created.application_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Completed,
}

pub struct ApplicationSubmissionFlow {
    client: Arc<dyn BackendClient>,
    slot: ApplicationIdSlot,
    phase: Arc<Mutex<SubmissionPhase>>,
    timeout: Duration,
}

impl ApplicationSubmissionFlow {
    pub fn new(
        client: Arc<dyn BackendClient>,
        slot: ApplicationIdSlot,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            slot,
            phase: Arc::new(Mutex::new(SubmissionPhase::Idle)),
            timeout,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase() == SubmissionPhase::Submitting
    }

    pub fn slot(&self) -> &ApplicationIdSlot {
        &self.slot
    }

    /// Starts the background create. Only the first call does anything; it
    /// returns the task handle, later calls return `None`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger(
        &self,
        payload: ApplicationPayload,
    ) -> Option<JoinHandle<Result<ApplicationId, SubmissionError>>> {
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            let current = *phase;
            if current != SubmissionPhase::Idle {
                debug!(phase = ?current, "submission already triggered");
                return None;
            }
            *phase = SubmissionPhase::Submitting;
        }

        let client = Arc::clone(&self.client);
        let slot = self.slot.clone();
        let phase = Arc::clone(&self.phase);
        let timeout = self.timeout;

        Some(tokio::spawn(async move {
            let result = slot.get_or_create(client.as_ref(), &payload, timeout).await;
            if let Err(error) = &result {
                error!(%error, "background application create failed");
            }
            *phase.lock().unwrap_or_else(PoisonError::into_inner) = SubmissionPhase::Completed;
            result
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use loan_core::{AttachOutcome, CreatedApplication, DocumentSet};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixtures::sample_payload;

    // ── stub ──────────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct CountingBackend {
        creates: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl BackendClient for CountingBackend {
        async fn create_application(
            &self,
            _payload: &ApplicationPayload,
        ) -> Result<CreatedApplication, ClientError> {
            let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ClientError::Status {
                    status: 500,
                    message: "Server error".to_string(),
                });
            }
            Ok(CreatedApplication {
                application_id: ApplicationId::new(format!("app-{n}")),
            })
        }

        async fn attach_documents(
            &self,
            _application_id: &ApplicationId,
            _documents: &DocumentSet,
        ) -> Result<AttachOutcome, ClientError> {
            unreachable!("submission never uploads")
        }

        async fn health(&self) -> Result<(), ClientError> {
            Ok(())
        }
    }

    fn flow(backend: Arc<CountingBackend>) -> ApplicationSubmissionFlow {
        ApplicationSubmissionFlow::new(backend, ApplicationIdSlot::new(), DEFAULT_CREATE_TIMEOUT)
    }

    // =========================================================================
    // trigger
    // =========================================================================

    #[tokio::test]
    async fn first_trigger_creates_and_stores_identifier() {
        let backend = Arc::new(CountingBackend::default());
        let flow = flow(Arc::clone(&backend));

        let handle = flow.trigger(sample_payload()).unwrap();
        let id = handle.await.unwrap().unwrap();

        assert_eq!(id, ApplicationId::new("app-1"));
        assert_eq!(flow.slot().get(), Some(id));
        assert_eq!(flow.phase(), SubmissionPhase::Completed);
    }

    #[tokio::test]
    async fn double_trigger_issues_one_create() {
        let backend = Arc::new(CountingBackend::default());
        let flow = flow(Arc::clone(&backend));

        let first = flow.trigger(sample_payload());
        let second = flow.trigger(sample_payload());

        assert!(first.is_some());
        assert!(second.is_none());
        first.unwrap().await.unwrap().unwrap();
        assert!(flow.trigger(sample_payload()).is_none());
        assert_eq!(backend.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn phase_is_submitting_while_create_runs() {
        let backend = Arc::new(CountingBackend {
            delay: Some(Duration::from_millis(50)),
            ..CountingBackend::default()
        });
        let flow = flow(backend);

        let handle = flow.trigger(sample_payload()).unwrap();
        assert!(flow.is_in_flight());

        handle.await.unwrap().unwrap();
        assert!(!flow.is_in_flight());
    }

    #[tokio::test]
    async fn failed_create_leaves_slot_empty_and_clears_in_flight() {
        let backend = Arc::new(CountingBackend {
            fail: true,
            ..CountingBackend::default()
        });
        let flow = flow(backend);

        let result = flow.trigger(sample_payload()).unwrap().await.unwrap();

        assert!(matches!(
            result,
            Err(SubmissionError::Client(ClientError::Status { status: 500, .. }))
        ));
        assert!(!flow.slot().is_set());
        assert_eq!(flow.phase(), SubmissionPhase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_create_times_out() {
        let backend = Arc::new(CountingBackend {
            delay: Some(Duration::from_secs(30)),
            ..CountingBackend::default()
        });
        let flow = flow(backend);

        let result = flow.trigger(sample_payload()).unwrap().await.unwrap();

        assert_eq!(result, Err(SubmissionError::Timeout(DEFAULT_CREATE_TIMEOUT)));
        assert!(!flow.slot().is_set());
    }

    // =========================================================================
    // slot
    // =========================================================================

    #[tokio::test]
    async fn slot_returns_stored_identifier_without_creating() {
        let backend = CountingBackend::default();
        let slot = ApplicationIdSlot::new();
        let payload = sample_payload();

        let first = slot.get_or_create(&backend, &payload, DEFAULT_CREATE_TIMEOUT).await.unwrap();
        let second = slot.get_or_create(&backend, &payload, DEFAULT_CREATE_TIMEOUT).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slot_retries_after_failed_create() {
        let failing = CountingBackend {
            fail: true,
            ..CountingBackend::default()
        };
        let working = CountingBackend::default();
        let slot = ApplicationIdSlot::new();
        let payload = sample_payload();

        assert!(slot.get_or_create(&failing, &payload, DEFAULT_CREATE_TIMEOUT).await.is_err());
        let id = slot.get_or_create(&working, &payload, DEFAULT_CREATE_TIMEOUT).await.unwrap();

        assert_eq!(id, ApplicationId::new("app-1"));
    }
}
