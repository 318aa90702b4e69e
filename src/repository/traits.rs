//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for item data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, Item};
use super::invalidation::QueryStream;

/// Source of item data
///
/// Reads are live streams that yield the current value and then every
/// change; writes are one-shot and never fail on missing or duplicate ids.
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    /// All items ordered by name
    fn get_all_items_stream(&self) -> QueryStream<Vec<Item>>;

    /// One item, `None` while no row has this id
    fn get_item_stream(&self, id: u32) -> QueryStream<Option<Item>>;

    /// Insert an item; returns the new id, or `None` if the id was taken
    async fn insert_item(&self, item: &Item) -> DomainResult<Option<u32>>;

    /// Delete the row with `item.id`
    async fn delete_item(&self, item: &Item) -> DomainResult<()>;

    /// Overwrite the row with `item.id`
    async fn update_item(&self, item: &Item) -> DomainResult<()>;

    /// Atomically take one unit out of stock; `false` if the row is
    /// missing or its quantity is already zero or less
    async fn reduce_quantity(&self, id: u32) -> DomainResult<bool>;
}
