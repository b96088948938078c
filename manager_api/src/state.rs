//! API server state.

use std::sync::Arc;

use portainer_client::PortainerService;

/// Shared state for the API server.
#[derive(Clone)]
pub struct ApiState {
    /// The Portainer service all handlers delegate to.
    pub service: Arc<PortainerService>,
}

impl ApiState {
    pub fn new(service: Arc<PortainerService>) -> Self {
        Self { service }
    }
}
