//! Dependency Container
//!
//! Builds the repository once and hands it to every screen's view-model.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::AppConfig;
use crate::domain::DomainResult;
use crate::repository::{init_db, ItemDao, ItemsRepository, OfflineItemsRepository};
use crate::viewmodel::{
    HomeViewModel, ItemDetailsViewModel, ItemEditViewModel, ItemEntryViewModel, NavArgs,
};

static GLOBAL: OnceCell<AppContainer> = OnceCell::const_new();

/// Shared services for the whole app
#[derive(Clone)]
pub struct AppContainer {
    items_repository: Arc<dyn ItemsRepository>,
    stop_timeout: Duration,
}

impl AppContainer {
    /// Container over any repository implementation
    pub fn new(items_repository: Arc<dyn ItemsRepository>, stop_timeout: Duration) -> Self {
        Self {
            items_repository,
            stop_timeout,
        }
    }

    /// Open the configured database and build the container around it
    pub async fn open(config: &AppConfig) -> DomainResult<Self> {
        let db = init_db(&config.database_path()).await?;
        let repo = OfflineItemsRepository::new(ItemDao::new(db));
        Ok(Self::new(Arc::new(repo), config.stop_timeout()))
    }

    /// Process-wide container. The first call opens the database; later
    /// calls return the same instance and ignore `config`. Concurrent first
    /// calls open it only once.
    pub async fn global(config: &AppConfig) -> DomainResult<&'static AppContainer> {
        GLOBAL.get_or_try_init(|| Self::open(config)).await
    }

    pub fn items_repository(&self) -> Arc<dyn ItemsRepository> {
        self.items_repository.clone()
    }

    pub fn home_view_model(&self) -> HomeViewModel {
        HomeViewModel::new(self.items_repository(), self.stop_timeout)
    }

    pub fn entry_view_model(&self) -> ItemEntryViewModel {
        ItemEntryViewModel::new(self.items_repository())
    }

    pub fn edit_view_model(&self, args: &NavArgs) -> DomainResult<ItemEditViewModel> {
        ItemEditViewModel::new(args, self.items_repository())
    }

    pub fn details_view_model(&self, args: &NavArgs) -> DomainResult<ItemDetailsViewModel> {
        ItemDetailsViewModel::new(args, self.items_repository(), self.stop_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, Item, ItemDetails};
    use futures::StreamExt;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_screens_share_one_store() {
        let container = AppContainer::open(&AppConfig::in_memory()).await.unwrap();

        let mut entry = container.entry_view_model();
        entry.update_ui_state(ItemDetails::new("Pen", "1.50", "4"));
        assert!(entry.save_item().await.unwrap());

        let home = container.home_view_model();
        let mut rx = home.ui_state();
        timeout(WAIT, rx.wait_for(|s| s.item_list.len() == 1)).await.unwrap().unwrap();
        let id = home.current_state().item_list[0].id;

        let details = container.details_view_model(&NavArgs::for_item(id)).unwrap();
        assert!(details.reduce_quantity_by_one().await.unwrap());
        timeout(WAIT, rx.wait_for(|s| s.item_list.first().map(|i| i.quantity) == Some(3)))
            .await
            .unwrap()
            .unwrap();

        let mut edit = container.edit_view_model(&NavArgs::for_item(id)).unwrap();
        edit.load().await.unwrap();
        assert_eq!(edit.item_ui_state().item_details.quantity, "3");
    }

    #[tokio::test]
    async fn test_screens_reject_missing_id() {
        let container = AppContainer::new(
            Arc::new(crate::repository::InMemoryItemsRepository::new()),
            Duration::from_millis(10),
        );
        assert!(matches!(
            container.edit_view_model(&NavArgs::new()),
            Err(DomainError::MissingArgument(_))
        ));
        assert!(matches!(
            container.details_view_model(&NavArgs::new()),
            Err(DomainError::MissingArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_global_is_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::new(dir.path());

        let first = AppContainer::global(&config).await.unwrap();
        let second = AppContainer::global(&AppConfig::in_memory()).await.unwrap();
        assert!(std::ptr::eq(first, second));

        first
            .items_repository()
            .insert_item(&Item::new("Shared", 1.0, 1))
            .await
            .unwrap();
        let items = second
            .items_repository()
            .get_all_items_stream()
            .next()
            .await
            .unwrap()
            .unwrap();
        assert!(items.iter().any(|i| i.name == "Shared"));
    }
}
