use std::sync::Arc;

use voodio_core::{MediaCatalog, SanitizedConfig, ServiceContext};

/// Shared application state
pub struct AppState {
    config: SanitizedConfig,
    catalog: Arc<dyn MediaCatalog>,
}

impl AppState {
    pub fn new(config: SanitizedConfig, catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn from_context(context: &ServiceContext) -> Self {
        Self::new(context.config.clone(), Arc::clone(&context.catalog))
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        self.config.clone()
    }

    pub fn catalog(&self) -> &dyn MediaCatalog {
        self.catalog.as_ref()
    }
}
