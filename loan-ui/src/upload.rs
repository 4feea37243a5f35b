//! Attach-documents half of the two-phase protocol.
//!
//! [`DocumentUploadCoordinator::submit`] makes sure an application exists
//! (reusing the identifier from the background create, or creating the record
//! itself), then sends every selected file in a single multipart request.
//! Only one upload runs at a time; a second call while one is in flight
//! returns [`UploadOutcome::AlreadyInFlight`] without touching the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use loan_core::{ApplicationId, ApplicationPayload, BackendClient, ClientError, DocumentSet};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::submission::{ApplicationIdSlot, SubmissionError};

pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// A failed upload. All variants are retryable: session state and the
/// caller's files are left as they were.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select at least one document to upload.")]
    NoDocuments,

    #[error("could not obtain an application id: {0}")]
    MissingApplication(#[source] SubmissionError),

    #[error("application {0} was not found")]
    ApplicationNotFound(String),

    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload did not finish within {0:?}")]
    Timeout(Duration),

    #[error("upload failed: {0}")]
    Client(#[source] ClientError),

    /// The backend answered but reported `success: false`.
    #[error("upload failed: {0}")]
    Failed(String),
}

impl From<ClientError> for UploadError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotFound(id) => Self::ApplicationNotFound(id),
            ClientError::Rejected(message) => Self::Rejected(message),
            other => Self::Client(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded {
        application_id: ApplicationId,
        file_count: usize,
    },
    /// Another upload was already running; this call did nothing.
    AlreadyInFlight,
}

/// Holds the in-flight flag for as long as it lives.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct DocumentUploadCoordinator {
    client: Arc<dyn BackendClient>,
    slot: ApplicationIdSlot,
    in_flight: AtomicBool,
    create_timeout: Duration,
    upload_timeout: Duration,
}

impl DocumentUploadCoordinator {
    pub fn new(
        client: Arc<dyn BackendClient>,
        slot: ApplicationIdSlot,
        create_timeout: Duration,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            client,
            slot,
            in_flight: AtomicBool::new(false),
            create_timeout,
            upload_timeout,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns the stored identifier, or creates the application from
    /// `fallback` when none exists yet. Idempotent once it has succeeded.
    pub async fn ensure_application_id(
        &self,
        fallback: &ApplicationPayload,
    ) -> Result<ApplicationId, SubmissionError> {
        if let Some(id) = self.slot.get() {
            return Ok(id);
        }
        debug!("no application id yet; creating before upload");
        self.slot
            .get_or_create(self.client.as_ref(), fallback, self.create_timeout)
            .await
    }

    /// Uploads `documents` to the session's application.
    ///
    /// `fallback` is only used when no application has been created yet.
    pub async fn submit(
        &self,
        documents: &DocumentSet,
        fallback: &ApplicationPayload,
    ) -> Result<UploadOutcome, UploadError> {
        if documents.is_empty() {
            warn!("upload requested without documents");
            return Err(UploadError::NoDocuments);
        }

        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("upload already in flight");
            return Ok(UploadOutcome::AlreadyInFlight);
        };

        let application_id = self
            .ensure_application_id(fallback)
            .await
            .map_err(UploadError::MissingApplication)?;

        let outcome = tokio::time::timeout(
            self.upload_timeout,
            self.client.attach_documents(&application_id, documents),
        )
        .await
        .map_err(|_| UploadError::Timeout(self.upload_timeout))??;

        if !outcome.success {
            let message = outcome
                .message
                .unwrap_or_else(|| "backend reported failure".to_string());
            warn!(%application_id, %message, "upload not accepted");
            return Err(UploadError::Failed(message));
        }

        let file_count = documents.file_count();
        info!(%application_id, file_count, "documents uploaded");
        Ok(UploadOutcome::Uploaded {
            application_id,
            file_count,
        })
    }
}
