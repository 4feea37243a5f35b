use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::backend::{BackendClient, ClientError};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Backend-agnostic connection configuration.
///
/// `backend` must match the [`BackendFactory::backend_name`] of a registered
/// factory. `base_url` is passed through unchanged; backends that do not talk
/// to a server ignore it.
///
/// | backend  | base_url examples                  |
/// |----------|------------------------------------|
/// | `http`   | `http://localhost:5001`            |
/// | `memory` | ignored                            |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// One implementation per backend. Each backend crate exports a single unit
/// struct that implements this trait and is registered with a
/// [`BackendRegistry`] at startup.
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use client for `config`.
    async fn create(
        &self,
        config: &ClientConfig,
    ) -> Result<Arc<dyn BackendClient>, ClientError>;
}

/// Registry of [`BackendFactory`] instances, keyed by backend name.
pub struct BackendRegistry {
    factories: HashMap<&'static str, Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory. A factory with the same name is replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn BackendFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`ClientError::Configuration`] when no factory is registered under
    ///   the requested name.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &ClientConfig,
    ) -> Result<Arc<dyn BackendClient>, ClientError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                ClientError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        tracing::debug!(backend = factory.backend_name(), "creating backend client");
        factory.create(config).await
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
