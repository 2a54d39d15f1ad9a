//! Application context - dependency injection container

use std::sync::Arc;

use ordersheet_core::{HandleProvider, OrderLedgerService};
use ordersheet_domain::Config;
use ordersheet_infra::sheets::HandleCacheConfig;
use ordersheet_infra::{GoogleHandleFactory, ServiceHandleCache};
use tracing::info;

/// Application context - holds the services shared by every request
pub struct AppContext {
    pub ledger: Arc<OrderLedgerService>,
    pub handles: Arc<dyn HandleProvider>,
}

impl AppContext {
    /// Wire config → handle factory → handle cache → ledger service.
    ///
    /// No remote call is made here; the first request builds the handle.
    pub fn new(config: &Config) -> Self {
        let factory = GoogleHandleFactory::new(&config.google, &config.http);
        let cache = ServiceHandleCache::new(factory, HandleCacheConfig::from(&config.cache));

        info!(
            application = %config.google.application_name,
            spreadsheet_id = %config.google.customers_spreadsheet_id,
            api_base = %config.google.sheets_api_base,
            "application context initialised"
        );

        Self::with_handles(Arc::new(cache), config.google.customers_spreadsheet_id.clone())
    }

    /// Build a context around an existing handle provider.
    pub fn with_handles(handles: Arc<dyn HandleProvider>, spreadsheet_id: impl Into<String>) -> Self {
        let ledger = Arc::new(OrderLedgerService::new(Arc::clone(&handles), spreadsheet_id));
        Self { ledger, handles }
    }

    /// Ledger service shared by the webhook handlers.
    pub fn ledger(&self) -> &OrderLedgerService {
        &self.ledger
    }
}
