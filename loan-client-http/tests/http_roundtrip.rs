//! Drives [`HttpBackendClient`] against a local axum server that speaks the
//! backend's wire protocol on top of the in-memory store.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use loan_backend_memory::InMemoryBackend;
use loan_client_http::HttpBackendClient;
use loan_core::{
    ApplicantProfile, ApplicationId, ApplicationPayload, BackendClient, BusinessProfile,
    ClientError, DocumentFile, DocumentSet, DocumentSlot, LoanCalculatorInput,
    LoanCalculatorOutput, ProductType,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

/// (field name, file name) of every file part the server received.
type Received = Arc<Mutex<Vec<(String, String)>>>;

#[derive(Clone)]
struct TestServer {
    backend: Arc<InMemoryBackend>,
    received: Received,
}

async fn health() -> &'static str {
    "Loan API is running"
}

async fn create(
    State(server): State<TestServer>,
    Json(payload): Json<ApplicationPayload>,
) -> impl IntoResponse {
    match server.backend.create_application(&payload).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "id": created.application_id,
                "applicationId": created.application_id,
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Server error"})),
        ),
    }
}

async fn upload(
    State(server): State<TestServer>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut application_id = None;
    let mut documents = DocumentSet::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();

        let Some(file_name) = file_name else {
            if name == "applicationId" {
                application_id = Some(String::from_utf8(bytes).unwrap());
            }
            continue;
        };

        server
            .received
            .lock()
            .unwrap()
            .push((name.clone(), file_name.clone()));

        let file = DocumentFile::new(file_name, bytes);
        match DocumentSlot::parse_field_name(&name) {
            Some(slot) => documents.set(slot, file),
            None => documents.push_bank_statement(file),
        }
    }

    let Some(application_id) = application_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "applicationId is required to attach documents"
            })),
        );
    };

    match server
        .backend
        .attach_documents(&ApplicationId::new(application_id), &documents)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({"success": outcome.success, "message": outcome.message})),
        ),
        Err(ClientError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": "Application not found for given applicationId"
            })),
        ),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": err.to_string()})),
        ),
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_backend() -> (String, TestServer) {
    let server = TestServer {
        backend: Arc::new(InMemoryBackend::new()),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let router = Router::new()
        .route("/", get(health))
        .route("/api/applications", post(create))
        .route("/api/applications/upload-docs", post(upload))
        .with_state(server.clone());

    (spawn(router).await, server)
}

fn payload() -> ApplicationPayload {
    let applicant = ApplicantProfile {
        full_name: "Meera Nair".to_string(),
        mobile: "9988776655".to_string(),
        email: "meera@nair.in".to_string(),
        pan_number: "MEERA1234N".to_string(),
    };
    let business = BusinessProfile {
        trade_name: "Nair Spices".to_string(),
        vintage: "5+ years".to_string(),
        address: "MG Road".to_string(),
        pincode: "682016".to_string(),
        city: "Kochi".to_string(),
        state: "Kerala".to_string(),
        constitution_type: "Private Limited".to_string(),
        annual_turnover: "1Cr-5Cr".to_string(),
        industry_type: "Trading".to_string(),
        monthly_obligation: dec!(25000),
        gst_number: Some("32ABCDE1234F1Z5".to_string()),
        registration_number: None,
    };
    ApplicationPayload::new(
        &applicant,
        &business,
        &LoanCalculatorInput::default(),
        &LoanCalculatorOutput::ZERO,
        Some(ProductType::TermLoan),
    )
}

fn pdf(name: &str) -> DocumentFile {
    DocumentFile::new(name, b"%PDF-1.7".to_vec()).with_content_type("application/pdf")
}

#[tokio::test]
async fn health_succeeds_against_running_server() {
    let (base, _) = spawn_backend().await;
    let client = HttpBackendClient::new(base).unwrap();

    client.health().await.unwrap();
}

#[tokio::test]
async fn create_returns_the_id_the_server_stored() {
    let (base, server) = spawn_backend().await;
    let client = HttpBackendClient::new(base).unwrap();

    let created = client.create_application(&payload()).await.unwrap();

    let record = server.backend.get(&created.application_id).await.unwrap();
    assert_eq!(record.application, payload());
    assert_eq!(record.status, "New");
}

#[tokio::test]
async fn upload_sends_one_part_per_file_in_order() {
    let (base, server) = spawn_backend().await;
    let client = HttpBackendClient::new(base).unwrap();
    let id = client.create_application(&payload()).await.unwrap().application_id;

    let documents = DocumentSet::new()
        .with(DocumentSlot::Identity, pdf("pan.pdf"))
        .with_bank_statement(pdf("jan.pdf"))
        .with_bank_statement(pdf("feb.pdf"));

    let outcome = client.attach_documents(&id, &documents).await.unwrap();

    assert!(outcome.success);
    assert_eq!(
        *server.received.lock().unwrap(),
        vec![
            ("identityDoc".to_string(), "pan.pdf".to_string()),
            ("bankStatementDoc".to_string(), "jan.pdf".to_string()),
            ("bankStatementDoc".to_string(), "feb.pdf".to_string()),
        ]
    );
    let stored = server.backend.get(&id).await.unwrap().documents;
    assert!(stored.identity.is_some());
    assert_eq!(stored.bank_statements.len(), 2);
}

#[tokio::test]
async fn upload_to_unknown_id_maps_to_not_found() {
    let (base, _) = spawn_backend().await;
    let client = HttpBackendClient::new(base).unwrap();
    let documents = DocumentSet::new().with(DocumentSlot::Address, pdf("aadhaar.pdf"));

    let result = client
        .attach_documents(&ApplicationId::new("does-not-exist"), &documents)
        .await;

    assert_eq!(
        result,
        Err(ClientError::NotFound("does-not-exist".to_string()))
    );
}

#[tokio::test]
async fn upload_without_files_maps_to_rejected_with_server_message() {
    let (base, _) = spawn_backend().await;
    let client = HttpBackendClient::new(base).unwrap();
    let id = client.create_application(&payload()).await.unwrap().application_id;

    let result = client.attach_documents(&id, &DocumentSet::new()).await;

    match result {
        Err(ClientError::Rejected(message)) => {
            assert!(message.contains("No documents received"), "got {message}");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_on_create_carries_status_and_message() {
    async fn fail() -> impl IntoResponse {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Server error"})),
        )
    }
    let base = spawn(Router::new().route("/api/applications", post(fail))).await;
    let client = HttpBackendClient::new(base).unwrap();

    let result = client.create_application(&payload()).await;

    assert_eq!(
        result,
        Err(ClientError::Status {
            status: 500,
            message: "Server error".to_string(),
        })
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = HttpBackendClient::new(format!("http://{addr}")).unwrap();

    let result = client.health().await;

    assert!(matches!(result, Err(ClientError::Transport(_))));
}
