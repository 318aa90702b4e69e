//! Home screen state: the live inventory list

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::domain::Item;
use crate::repository::ItemsRepository;
use super::shared::SharedState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeUiState {
    pub item_list: Vec<Item>,
}

/// State holder for the inventory list
pub struct HomeViewModel {
    ui_state: SharedState<HomeUiState>,
}

impl HomeViewModel {
    /// Must be called within a Tokio runtime.
    pub fn new(repository: Arc<dyn ItemsRepository>, stop_timeout: Duration) -> Self {
        let ui_state = SharedState::while_subscribed(HomeUiState::default(), stop_timeout, move || {
            repository
                .get_all_items_stream()
                .map(|next| next.map(|item_list| HomeUiState { item_list }))
                .boxed()
        });
        Self { ui_state }
    }

    pub fn ui_state(&self) -> watch::Receiver<HomeUiState> {
        self.ui_state.subscribe()
    }

    pub fn current_state(&self) -> HomeUiState {
        self.ui_state.value()
    }
}
