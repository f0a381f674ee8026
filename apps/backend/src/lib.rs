#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod gateway;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod ws;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::draft::DraftRules;
pub use error::AppError;
pub use errors::DraftError;
pub use gateway::{DataGateway, InMemoryGateway, StorageError};
pub use middleware::cors::cors_middleware;
pub use services::draft_flow::DraftCoordinator;
pub use state::app_state::AppState;
pub use ws::hub::{DraftEvent, DraftSessionRegistry};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
