use std::sync::Arc;

use crate::config::Config;
use crate::gateway::{AuthGateway, DataGateway, StorageGateway};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthGateway>,
    pub data: Arc<dyn DataGateway>,
    pub storage: Arc<dyn StorageGateway>,
    pub config: Config,
}
