use std::sync::Arc;

use crate::llm_client::ChatCompletion;
use crate::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    /// Chat backend. `LlmClient` in production, a scripted stub in tests.
    pub llm: Arc<dyn ChatCompletion>,
}
