use std::sync::Arc;

use async_trait::async_trait;

use loan_core::client::{BackendFactory, ClientConfig};
use loan_core::{BackendClient, ClientError};

use crate::InMemoryBackend;

/// [`BackendFactory`] for the in-process backend.
///
/// Every client handed out by one factory shares the same store, so the
/// caller can keep the factory's [`InMemoryBackend`] to inspect what was
/// written:
///
/// ```rust
/// use loan_core::client::BackendRegistry;
/// use loan_backend_memory::MemoryBackendFactory;
///
/// let factory = MemoryBackendFactory::new();
/// let store = factory.store();
/// let mut registry = BackendRegistry::new();
/// registry.register(Box::new(factory));
/// # drop(store);
/// ```
#[derive(Clone, Default)]
pub struct MemoryBackendFactory {
    store: Arc<InMemoryBackend>,
}

impl MemoryBackendFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> Arc<InMemoryBackend> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl BackendFactory for MemoryBackendFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    /// `config.base_url` is ignored.
    async fn create(
        &self,
        _config: &ClientConfig,
    ) -> Result<Arc<dyn BackendClient>, ClientError> {
        Ok(self.store())
    }
}
