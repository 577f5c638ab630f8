//! Shared application state for all routes.

use crate::provider::Provider;

#[derive(Clone)]
pub struct AppState {
    pub provider: Provider,
}

impl AppState {
    pub fn new(provider: Provider) -> Self {
        AppState { provider }
    }
}
