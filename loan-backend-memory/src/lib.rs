//! In-process implementation of the application backend.
//!
//! Keeps records in a map guarded by an async lock and mirrors the storage
//! rules of the real service: records start with status `"New"`, document
//! references look like `/uploads/<unique>-<file_name>`, and attaching
//! documents only touches the slots present in the request.

mod factory;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use loan_core::{
    ApplicationId, ApplicationPayload, ApplicationRecord, AttachOutcome, BackendClient,
    ClientError, CreatedApplication, DEFAULT_STATUS, DocumentFile, DocumentReferences,
    DocumentSet, DocumentSlot,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use factory::MemoryBackendFactory;

#[derive(Default)]
pub struct InMemoryBackend {
    records: RwLock<HashMap<ApplicationId, ApplicationRecord>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(
        &self,
        id: &ApplicationId,
    ) -> Option<ApplicationRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Builds the stored reference for one uploaded file. Whitespace in the
/// original name becomes `_`.
fn stored_reference(file: &DocumentFile) -> String {
    let safe_name: String = file
        .file_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!(
        "/uploads/{}-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        safe_name
    )
}

/// Writes the references for every present slot; absent slots keep whatever
/// was attached before.
fn apply_documents(
    references: &mut DocumentReferences,
    documents: &DocumentSet,
) {
    for slot in DocumentSlot::ALL {
        let Some(file) = documents.slot(slot) else {
            continue;
        };
        let reference = Some(stored_reference(file));
        match slot {
            DocumentSlot::Identity => references.identity = reference,
            DocumentSlot::Address => references.address = reference,
            DocumentSlot::BusinessRegistration => references.business_registration = reference,
            DocumentSlot::UtilityBill => references.utility_bill = reference,
        }
    }

    if !documents.bank_statements.is_empty() {
        references.bank_statements = documents
            .bank_statements
            .iter()
            .map(stored_reference)
            .collect();
    }
}

#[async_trait]
impl BackendClient for InMemoryBackend {
    async fn create_application(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<CreatedApplication, ClientError> {
        let id = ApplicationId::new(Uuid::new_v4().to_string());
        let now = Utc::now();
        let record = ApplicationRecord {
            id: id.clone(),
            application: payload.clone(),
            documents: DocumentReferences::default(),
            status: DEFAULT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.records.write().await.insert(id.clone(), record);
        info!(application_id = %id, "application created");

        Ok(CreatedApplication { application_id: id })
    }

    async fn attach_documents(
        &self,
        application_id: &ApplicationId,
        documents: &DocumentSet,
    ) -> Result<AttachOutcome, ClientError> {
        if documents.is_empty() {
            warn!(%application_id, "attach request without files");
            return Err(ClientError::Rejected(
                "No documents received to upload".to_string(),
            ));
        }

        let mut records = self.records.write().await;
        let record = records
            .get_mut(application_id)
            .ok_or_else(|| ClientError::NotFound(application_id.to_string()))?;

        apply_documents(&mut record.documents, documents);
        record.updated_at = Utc::now();
        debug!(
            %application_id,
            files = documents.file_count(),
            "documents attached"
        );

        Ok(AttachOutcome {
            success: true,
            message: Some("Documents uploaded & linked to application".to_string()),
        })
    }

    async fn health(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use loan_core::{
        ApplicantProfile, BusinessProfile, LoanCalculatorInput, LoanCalculatorOutput, ProductType,
    };
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn payload() -> ApplicationPayload {
        let applicant = ApplicantProfile {
            full_name: "Ravi Kumar".to_string(),
            mobile: "9123456780".to_string(),
            email: "ravi@kumar.co".to_string(),
            pan_number: "PQRST6789Z".to_string(),
        };
        let business = BusinessProfile {
            trade_name: "Kumar Foods".to_string(),
            vintage: "1-3 years".to_string(),
            address: "4 Park Street".to_string(),
            pincode: "700016".to_string(),
            city: "Kolkata".to_string(),
            state: "West Bengal".to_string(),
            constitution_type: "Partnership".to_string(),
            annual_turnover: "10L-50L".to_string(),
            industry_type: "Food".to_string(),
            monthly_obligation: dec!(0),
            gst_number: None,
            registration_number: None,
        };
        ApplicationPayload::new(
            &applicant,
            &business,
            &LoanCalculatorInput::default(),
            &LoanCalculatorOutput::ZERO,
            Some(ProductType::OverdraftLimit),
        )
    }

    fn file(name: &str) -> DocumentFile {
        DocumentFile::new(name, b"%PDF-1.4".to_vec())
    }

    #[tokio::test]
    async fn created_record_starts_as_new_without_documents() {
        let backend = InMemoryBackend::new();

        let created = backend.create_application(&payload()).await.unwrap();
        let record = backend.get(&created.application_id).await.unwrap();

        assert_eq!(record.status, "New");
        assert_eq!(record.documents, DocumentReferences::default());
        assert_eq!(record.application, payload());
    }

    #[tokio::test]
    async fn every_create_mints_a_distinct_id() {
        let backend = InMemoryBackend::new();

        let first = backend.create_application(&payload()).await.unwrap();
        let second = backend.create_application(&payload()).await.unwrap();

        assert_ne!(first.application_id, second.application_id);
        assert_eq!(backend.len().await, 2);
    }

    #[tokio::test]
    async fn attach_to_unknown_id_is_not_found() {
        let backend = InMemoryBackend::new();
        let docs = DocumentSet::new().with(DocumentSlot::Identity, file("pan.pdf"));

        let result = backend
            .attach_documents(&ApplicationId::new("missing"), &docs)
            .await;

        assert_eq!(result, Err(ClientError::NotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn attach_without_files_is_rejected() {
        let backend = InMemoryBackend::new();
        let created = backend.create_application(&payload()).await.unwrap();

        let result = backend
            .attach_documents(&created.application_id, &DocumentSet::new())
            .await;

        assert!(matches!(result, Err(ClientError::Rejected(_))));
    }

    #[tokio::test]
    async fn later_attach_keeps_earlier_slots() {
        let backend = InMemoryBackend::new();
        let id = backend
            .create_application(&payload())
            .await
            .unwrap()
            .application_id;

        let first = DocumentSet::new()
            .with(DocumentSlot::Identity, file("pan card.pdf"))
            .with_bank_statement(file("jan.pdf"));
        backend.attach_documents(&id, &first).await.unwrap();

        let second = DocumentSet::new().with(DocumentSlot::UtilityBill, file("bill.pdf"));
        backend.attach_documents(&id, &second).await.unwrap();

        let docs = backend.get(&id).await.unwrap().documents;
        let identity = docs.identity.unwrap();
        assert!(identity.starts_with("/uploads/"));
        assert!(identity.ends_with("-pan_card.pdf"));
        assert!(docs.utility_bill.unwrap().ends_with("-bill.pdf"));
        assert_eq!(docs.bank_statements.len(), 1);
        assert!(docs.address.is_none());
    }

    #[tokio::test]
    async fn new_bank_statements_replace_the_previous_list() {
        let backend = InMemoryBackend::new();
        let id = backend
            .create_application(&payload())
            .await
            .unwrap()
            .application_id;

        backend
            .attach_documents(
                &id,
                &DocumentSet::new()
                    .with_bank_statement(file("a.pdf"))
                    .with_bank_statement(file("b.pdf")),
            )
            .await
            .unwrap();
        backend
            .attach_documents(&id, &DocumentSet::new().with_bank_statement(file("c.pdf")))
            .await
            .unwrap();

        let statements = backend.get(&id).await.unwrap().documents.bank_statements;
        assert_eq!(statements.len(), 1);
        assert!(statements[0].ends_with("-c.pdf"));
    }
}
