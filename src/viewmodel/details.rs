//! Item details screen state
//!
//! Shows one item live and offers the "sell one" and "delete" actions.

use futures::{future, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::domain::{DomainResult, Item, ItemDetails};
use crate::repository::ItemsRepository;
use super::nav::NavArgs;
use super::shared::SharedState;

/// What the details screen renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetailsUiState {
    pub out_of_stock: bool,
    pub item_details: ItemDetails,
}

impl Default for ItemDetailsUiState {
    fn default() -> Self {
        Self {
            out_of_stock: true,
            item_details: ItemDetails::default(),
        }
    }
}

impl From<&Item> for ItemDetailsUiState {
    fn from(item: &Item) -> Self {
        Self {
            out_of_stock: item.is_out_of_stock(),
            item_details: item.to_item_details(),
        }
    }
}

/// State holder for the item details screen
pub struct ItemDetailsViewModel {
    repository: Arc<dyn ItemsRepository>,
    item_id: u32,
    ui_state: SharedState<ItemDetailsUiState>,
}

impl ItemDetailsViewModel {
    /// Fails when the route did not carry an item id.
    /// Must be called within a Tokio runtime.
    pub fn new(
        args: &NavArgs,
        repository: Arc<dyn ItemsRepository>,
        stop_timeout: Duration,
    ) -> DomainResult<Self> {
        let item_id = args.item_id()?;

        let upstream_repo = repository.clone();
        // A deleted row keeps showing its last known state.
        let ui_state = SharedState::while_subscribed(ItemDetailsUiState::default(), stop_timeout, move || {
            upstream_repo
                .get_item_stream(item_id)
                .filter_map(|next| {
                    future::ready(match next {
                        Ok(Some(item)) => Some(Ok(ItemDetailsUiState::from(&item))),
                        Ok(None) => None,
                        Err(e) => Some(Err(e)),
                    })
                })
                .boxed()
        });

        Ok(Self {
            repository,
            item_id,
            ui_state,
        })
    }

    pub fn item_id(&self) -> u32 {
        self.item_id
    }

    pub fn ui_state(&self) -> watch::Receiver<ItemDetailsUiState> {
        self.ui_state.subscribe()
    }

    pub fn current_state(&self) -> ItemDetailsUiState {
        self.ui_state.value()
    }

    /// Sell one unit. Items already out of stock are left alone.
    ///
    /// Returns whether the stock was decremented. The check and the
    /// decrement happen in one store operation, so concurrent sells each
    /// take exactly one unit.
    pub async fn reduce_quantity_by_one(&self) -> DomainResult<bool> {
        let sold = self.repository.reduce_quantity(self.item_id).await?;
        if !sold {
            log::debug!("Item {} is out of stock or gone, nothing to sell", self.item_id);
        }
        Ok(sold)
    }

    /// Delete the item shown on this screen; returns whether it existed
    pub async fn delete_item(&self) -> DomainResult<bool> {
        let Some(item) = self.current_item().await? else {
            return Ok(false);
        };
        self.repository.delete_item(&item).await?;
        Ok(true)
    }

    async fn current_item(&self) -> DomainResult<Option<Item>> {
        Ok(self
            .repository
            .get_item_stream(self.item_id)
            .next()
            .await
            .transpose()?
            .flatten())
    }
}
