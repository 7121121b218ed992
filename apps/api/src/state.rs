use std::sync::Arc;

use crate::screening::ScreeningService;
use crate::store::HiringStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HiringStore>,
    pub screening: Arc<ScreeningService>,
}
