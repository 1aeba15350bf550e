//! Application state for the dockyard API

use std::sync::Arc;

use dockyard_core::BackendProvider;
use dockyard_gateway::{Aggregator, AggregatorConfig};

use crate::error::ApiError;

/// Application state shared across all handlers.
///
/// Holds no backend clients: every request asks the provider for fresh
/// ones and builds its own [`Aggregator`].
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn BackendProvider>,
    config: AggregatorConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn BackendProvider>, config: AggregatorConfig) -> Self {
        Self { provider, config }
    }

    /// Build the aggregator for one request
    pub async fn aggregator(&self) -> Result<Aggregator, ApiError> {
        let backends = self.provider.backends().await?;
        Ok(Aggregator::new(backends, self.config))
    }
}
