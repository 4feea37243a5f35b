use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    ApplicationId, ApplicationPayload, AttachOutcome, CreatedApplication, DocumentSet,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Application not found: {0}")]
    NotFound(String),

    /// The backend refused the request as malformed (missing id, no files).
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The backend collaborator: creates application records and attaches
/// uploaded documents to them.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Stores a new application and returns its freshly minted identifier.
    async fn create_application(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<CreatedApplication, ClientError>;

    /// Attaches every file in `documents` to the record `application_id`.
    ///
    /// Only the slots present in `documents` are written; previously
    /// attached documents in other slots are kept.
    async fn attach_documents(
        &self,
        application_id: &ApplicationId,
        documents: &DocumentSet,
    ) -> Result<AttachOutcome, ClientError>;

    /// Succeeds when the backend is reachable.
    async fn health(&self) -> Result<(), ClientError>;
}
