//! SQLite-backed ItemsRepository

use async_trait::async_trait;

use crate::domain::{DomainResult, Item};
use super::invalidation::QueryStream;
use super::item_dao::ItemDao;
use super::traits::ItemsRepository;

/// Repository over the local database
pub struct OfflineItemsRepository {
    dao: ItemDao,
}

impl OfflineItemsRepository {
    pub fn new(dao: ItemDao) -> Self {
        Self { dao }
    }
}

#[async_trait]
impl ItemsRepository for OfflineItemsRepository {
    fn get_all_items_stream(&self) -> QueryStream<Vec<Item>> {
        self.dao.get_all_items()
    }

    fn get_item_stream(&self, id: u32) -> QueryStream<Option<Item>> {
        self.dao.get_item(id)
    }

    async fn insert_item(&self, item: &Item) -> DomainResult<Option<u32>> {
        self.dao.insert(item).await
    }

    async fn delete_item(&self, item: &Item) -> DomainResult<()> {
        self.dao.delete(item).await
    }

    async fn update_item(&self, item: &Item) -> DomainResult<()> {
        self.dao.update(item).await
    }

    async fn reduce_quantity(&self, id: u32) -> DomainResult<bool> {
        self.dao.reduce_quantity(id).await
    }
}
