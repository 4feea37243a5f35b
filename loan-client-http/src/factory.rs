use std::sync::Arc;

use async_trait::async_trait;

use loan_core::client::{BackendFactory, ClientConfig};
use loan_core::{BackendClient, ClientError};

use crate::HttpBackendClient;

/// [`BackendFactory`] for the REST backend.
///
/// ```rust
/// use loan_core::client::BackendRegistry;
/// use loan_client_http::HttpBackendFactory;
///
/// let mut registry = BackendRegistry::new();
/// registry.register(Box::new(HttpBackendFactory));
/// ```
pub struct HttpBackendFactory;

#[async_trait]
impl BackendFactory for HttpBackendFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// Builds a client for `config.base_url`. No request is sent; use
    /// [`BackendClient::health`] to check reachability.
    async fn create(
        &self,
        config: &ClientConfig,
    ) -> Result<Arc<dyn BackendClient>, ClientError> {
        Ok(Arc::new(HttpBackendClient::new(config.base_url.clone())?))
    }
}
