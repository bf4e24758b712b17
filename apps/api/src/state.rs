use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
/// Created once at startup; there is no other process-wide mutable state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}
