//! Application state.

use std::sync::Arc;

use tally_store::Store;

use crate::config::ServiceConfig;
use crate::executor::OperationExecutor;
use crate::random::RandomClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// The operation executor.
    pub executor: OperationExecutor,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let random = RandomClient::new(config.random_url.clone());
        let executor = OperationExecutor::new(Arc::clone(&store), random);

        Self {
            store,
            config,
            executor,
        }
    }
}
