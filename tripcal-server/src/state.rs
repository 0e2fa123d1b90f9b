use std::sync::Arc;

use tripcal_core::config::ServiceConfig;
use tripcal_core::feed::RequestTimeout;
use tripcal_core::sync::SyncEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        AppState {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn default_timeout(&self) -> RequestTimeout {
        self.config.default_request_timeout()
    }

    pub fn engine(&self) -> SyncEngine {
        SyncEngine::new(self.config.max_sync_attempts)
    }
}
