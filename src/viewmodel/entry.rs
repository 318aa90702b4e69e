//! Item entry screen state
//!
//! Holds the draft of a new item and whether it may be saved.

use std::sync::Arc;

use crate::domain::{DomainResult, Item, ItemDetails};
use crate::repository::ItemsRepository;

/// Form draft plus its validity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUiState {
    pub item_details: ItemDetails,
    pub is_entry_valid: bool,
}

impl ItemUiState {
    /// Wrap a draft, deriving validity from its contents
    pub fn from_details(item_details: ItemDetails) -> Self {
        let is_entry_valid = item_details.is_valid();
        Self { item_details, is_entry_valid }
    }
}

impl Item {
    pub fn to_item_ui_state(&self, is_entry_valid: bool) -> ItemUiState {
        ItemUiState {
            item_details: self.to_item_details(),
            is_entry_valid,
        }
    }
}

/// State holder for the "add item" screen
pub struct ItemEntryViewModel {
    repository: Arc<dyn ItemsRepository>,
    item_ui_state: ItemUiState,
}

impl ItemEntryViewModel {
    pub fn new(repository: Arc<dyn ItemsRepository>) -> Self {
        Self {
            repository,
            item_ui_state: ItemUiState::default(),
        }
    }

    pub fn item_ui_state(&self) -> &ItemUiState {
        &self.item_ui_state
    }

    /// Replace the draft and re-validate it
    pub fn update_ui_state(&mut self, item_details: ItemDetails) {
        self.item_ui_state = ItemUiState::from_details(item_details);
    }

    /// Insert the draft if it is valid.
    ///
    /// Returns `false` without touching the store when the draft is
    /// incomplete.
    pub async fn save_item(&self) -> DomainResult<bool> {
        let details = &self.item_ui_state.item_details;
        if !details.is_valid() {
            log::debug!("Refusing to save incomplete item draft");
            return Ok(false);
        }
        self.repository.insert_item(&details.to_item()).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryItemsRepository;
    use futures::StreamExt;

    fn setup() -> (Arc<InMemoryItemsRepository>, ItemEntryViewModel) {
        let repo = Arc::new(InMemoryItemsRepository::new());
        let vm = ItemEntryViewModel::new(repo.clone());
        (repo, vm)
    }

    async fn stored(repo: &InMemoryItemsRepository) -> Vec<Item> {
        repo.get_all_items_stream().next().await.unwrap().unwrap()
    }

    #[test]
    fn test_starts_empty_and_invalid() {
        let (_, vm) = setup();
        assert_eq!(vm.item_ui_state(), &ItemUiState::default());
        assert!(!vm.item_ui_state().is_entry_valid);
    }

    #[test]
    fn test_validity_follows_edits() {
        let (_, mut vm) = setup();

        vm.update_ui_state(ItemDetails::new("", "10.00", "5"));
        assert!(!vm.item_ui_state().is_entry_valid);

        vm.update_ui_state(ItemDetails::new("Pen", "10.00", "5"));
        assert!(vm.item_ui_state().is_entry_valid);

        vm.update_ui_state(ItemDetails::new("Pen", "ten", "lots"));
        assert!(vm.item_ui_state().is_entry_valid);
    }

    #[tokio::test]
    async fn test_save_valid_draft() {
        let (repo, mut vm) = setup();
        vm.update_ui_state(ItemDetails::new("Pen", "10.00", "5"));

        assert!(vm.save_item().await.unwrap());

        let items = stored(&repo).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pen");
        assert_eq!(items[0].price, 10.0);
        assert_eq!(items[0].quantity, 5);
        assert!(items[0].has_id());
    }

    #[tokio::test]
    async fn test_save_invalid_draft_is_refused() {
        let (repo, mut vm) = setup();
        vm.update_ui_state(ItemDetails::new("Pen", "", "5"));

        assert!(!vm.save_item().await.unwrap());
        assert!(stored(&repo).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_coerces_bad_numbers() {
        let (repo, mut vm) = setup();
        vm.update_ui_state(ItemDetails::new("Mystery", "cheap", "some"));

        assert!(vm.save_item().await.unwrap());

        let items = stored(&repo).await;
        assert_eq!(items[0].price, 0.0);
        assert_eq!(items[0].quantity, 0);
    }
}
