use std::sync::Arc;

use crate::llm_client::gateway::Gateway;
use crate::store::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation gateway with its retry and fallback policy baked in.
    pub gateway: Gateway,
    /// Completed-report slot read back by the dashboard endpoints.
    pub reports: Arc<dyn ReportStore>,
}
