//! View-Model Layer
//!
//! Per-screen state holders. They own transient form state, derive what
//! the screen shows from repository streams and forward user actions to
//! the repository.

mod shared;
mod nav;
mod entry;
mod edit;
mod details;
mod home;

pub use shared::{SharedState, DEFAULT_STOP_TIMEOUT};
pub use nav::{Destination, NavArgs, ITEM_ID_ARG};
pub use entry::{ItemEntryViewModel, ItemUiState};
pub use edit::ItemEditViewModel;
pub use details::{ItemDetailsUiState, ItemDetailsViewModel};
pub use home::{HomeUiState, HomeViewModel};
