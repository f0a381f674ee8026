use std::sync::Arc;

use crate::config::draft::DraftRules;
use crate::gateway::DataGateway;
use crate::services::draft_flow::DraftCoordinator;
use crate::ws::hub::DraftSessionRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<DraftSessionRegistry>,
    coordinator: Arc<DraftCoordinator>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn DataGateway>, defaults: DraftRules) -> Self {
        let registry = Arc::new(DraftSessionRegistry::new());
        let coordinator = DraftCoordinator::new(gateway, Arc::clone(&registry), defaults);
        Self {
            registry,
            coordinator,
        }
    }

    pub fn registry(&self) -> &Arc<DraftSessionRegistry> {
        &self.registry
    }

    pub fn coordinator(&self) -> &Arc<DraftCoordinator> {
        &self.coordinator
    }
}
