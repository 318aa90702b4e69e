//! Item edit screen state

use futures::StreamExt;
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult, ItemDetails};
use crate::repository::ItemsRepository;
use super::entry::ItemUiState;
use super::nav::NavArgs;

/// State holder for the "edit item" screen
pub struct ItemEditViewModel {
    repository: Arc<dyn ItemsRepository>,
    item_id: u32,
    item_ui_state: ItemUiState,
}

impl ItemEditViewModel {
    /// Fails when the route did not carry an item id; the screen cannot
    /// be shown without one.
    pub fn new(args: &NavArgs, repository: Arc<dyn ItemsRepository>) -> DomainResult<Self> {
        let item_id = args.item_id()?;
        Ok(Self {
            repository,
            item_id,
            item_ui_state: ItemUiState::default(),
        })
    }

    pub fn item_id(&self) -> u32 {
        self.item_id
    }

    pub fn item_ui_state(&self) -> &ItemUiState {
        &self.item_ui_state
    }

    /// Fill the draft from the stored item
    pub async fn load(&mut self) -> DomainResult<()> {
        let current = self
            .repository
            .get_item_stream(self.item_id)
            .next()
            .await
            .transpose()?
            .flatten()
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", self.item_id)))?;

        self.item_ui_state = current.to_item_ui_state(true);
        Ok(())
    }

    /// Replace the draft and re-validate it. The draft always keeps the id
    /// this screen was opened for.
    pub fn update_ui_state(&mut self, mut item_details: ItemDetails) {
        item_details.id = self.item_id;
        self.item_ui_state = ItemUiState::from_details(item_details);
    }

    /// Write the draft back if it is valid; returns whether a write was made
    pub async fn update_item(&self) -> DomainResult<bool> {
        let details = &self.item_ui_state.item_details;
        if !details.is_valid() {
            log::debug!("Refusing to update item {} with incomplete draft", self.item_id);
            return Ok(false);
        }
        let mut item = details.to_item();
        item.id = self.item_id;
        self.repository.update_item(&item).await?;
        Ok(true)
    }
}
