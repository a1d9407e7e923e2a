use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::dashboard::visit::VisitRegistry;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote generation service. `LlmClient` in production.
    pub generator: Arc<dyn TextGenerator>,
    /// Identity provider. `IdentityToolkitClient` in production.
    pub identity: Arc<dyn IdentityProvider>,
    pub visits: VisitRegistry,
}
