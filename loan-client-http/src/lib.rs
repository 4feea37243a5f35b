//! HTTP implementation of [`BackendClient`].
//!
//! | Operation            | Request                                          |
//! |----------------------|--------------------------------------------------|
//! | create application   | `POST {base}/api/applications` (JSON)            |
//! | attach documents     | `POST {base}/api/applications/upload-docs` (multipart) |
//! | health               | `GET {base}/`                                    |
//!
//! Error bodies look like `{"success": false, "message": "..."}`; the message
//! is carried into the returned [`ClientError`].

mod factory;

use std::time::Duration;

use async_trait::async_trait;
use loan_core::{
    APPLICATION_ID_FIELD, ApplicationId, ApplicationPayload, AttachOutcome, BackendClient,
    ClientError, CreatedApplication, DocumentSet,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

pub use factory::HttpBackendFactory;

pub const CREATE_PATH: &str = "/api/applications";
pub const UPLOAD_PATH: &str = "/api/applications/upload-docs";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("loan-intake/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    application_id: Option<ApplicationId>,
    id: Option<ApplicationId>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackendClient {
    /// Build a client for `base_url` (e.g. `http://localhost:5001`).
    ///
    /// Overall request deadlines are left to the caller; only connecting is
    /// bounded here.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Configuration(format!(
                "base url '{base_url}' must start with http:// or https://"
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(
        &self,
        path: &str,
    ) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn upload_form(
        application_id: &ApplicationId,
        documents: &DocumentSet,
    ) -> Result<Form, ClientError> {
        let mut form = Form::new().text(APPLICATION_ID_FIELD, application_id.to_string());

        for (field, file_name, file) in documents.parts() {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file_name);
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type).map_err(|e| {
                    ClientError::Configuration(format!(
                        "invalid content type '{content_type}': {e}"
                    ))
                })?;
            }
            form = form.part(field, part);
        }

        Ok(form)
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// Reads the `message` of an error body, falling back to the reason phrase.
async fn error_message(response: Response) -> String {
    let status = response.status();
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string())
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn create_application(
        &self,
        payload: &ApplicationPayload,
    ) -> Result<CreatedApplication, ClientError> {
        let url = self.endpoint(CREATE_PATH);
        debug!(%url, "creating application");

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(status = status.as_u16(), %message, "create application failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreateResponse = response.json().await.map_err(transport_error)?;
        let application_id = body
            .application_id
            .or(body.id)
            .ok_or_else(|| ClientError::Decode("response carried no applicationId".to_string()))?;

        Ok(CreatedApplication { application_id })
    }

    async fn attach_documents(
        &self,
        application_id: &ApplicationId,
        documents: &DocumentSet,
    ) -> Result<AttachOutcome, ClientError> {
        let url = self.endpoint(UPLOAD_PATH);
        let form = Self::upload_form(application_id, documents)?;
        debug!(%url, %application_id, files = documents.file_count(), "uploading documents");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        match status {
            s if s.is_success() => {
                // Any 2xx counts as attached, even when the body is not JSON.
                let outcome = response.json::<AttachOutcome>().await.unwrap_or(AttachOutcome {
                    success: true,
                    message: None,
                });
                Ok(outcome)
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(application_id.to_string())),
            StatusCode::BAD_REQUEST => Err(ClientError::Rejected(error_message(response).await)),
            _ => Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
        }
    }

    async fn health(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(self.endpoint("/"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rejects_base_url_without_scheme() {
        assert!(matches!(
            HttpBackendClient::new("localhost:5001"),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn endpoint_strips_trailing_slash_from_base() {
        let client = HttpBackendClient::new("http://api.example.in/").unwrap();

        assert_eq!(client.base_url(), "http://api.example.in");
        assert_eq!(
            client.endpoint(UPLOAD_PATH),
            "http://api.example.in/api/applications/upload-docs"
        );
    }

    #[test]
    fn create_response_prefers_application_id() {
        let body: CreateResponse =
            serde_json::from_str(r#"{"success":true,"id":"a","applicationId":"b"}"#).unwrap();

        assert_eq!(body.application_id.or(body.id), Some(ApplicationId::new("b")));
    }

    #[test]
    fn create_response_falls_back_to_id() {
        let body: CreateResponse = serde_json::from_str(r#"{"success":true,"id":"a"}"#).unwrap();

        assert_eq!(body.application_id.or(body.id), Some(ApplicationId::new("a")));
    }
}
