//! Inventory Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - viewmodel: Per-screen state holders and navigation arguments
//! - container: Wires the repository into the view-models

pub mod config;
pub mod container;
pub mod domain;
pub mod repository;
pub mod viewmodel;

pub use config::AppConfig;
pub use container::AppContainer;
pub use domain::{DomainError, DomainResult, Item, ItemDetails};
pub use repository::{InMemoryItemsRepository, ItemsRepository, OfflineItemsRepository};

/// Install logging, open the database and return the process-wide container.
///
/// Calling it again returns the container created by the first call.
pub async fn start(config: AppConfig) -> DomainResult<&'static AppContainer> {
    if let Err(e) = rolling_logger::init_logger(config.log_dir(), &config.app_name) {
        // Already installed by an earlier start, keep the first one.
        log::warn!("Logger not installed: {}", e);
    }
    log::info!("Starting {} with data in {}", config.app_name, config.data_dir.display());

    match AppContainer::global(&config).await {
        Ok(container) => {
            let _ = rolling_logger::info("DB init success");
            Ok(container)
        }
        Err(e) => {
            let _ = rolling_logger::error(&format!("DB init failed: {}", e));
            Err(e)
        }
    }
}
