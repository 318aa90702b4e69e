//! In-memory ItemsRepository
//!
//! Same contract as the SQLite repository, held in a map. Used for tests
//! and for running screens without a database file.

use async_trait::async_trait;
use futures::future;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{DomainError, DomainResult, Item};
use super::invalidation::{InvalidationTracker, QueryStream};
use super::traits::ItemsRepository;

#[derive(Default)]
struct Table {
    rows: BTreeMap<u32, Item>,
    // Highest id ever handed out or inserted; ids are not reused.
    last_id: u32,
}

impl Table {
    fn sorted(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.rows.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        items
    }
}

/// Map-backed repository
#[derive(Clone, Default)]
pub struct InMemoryItemsRepository {
    table: Arc<Mutex<Table>>,
    tracker: InvalidationTracker,
}

impl InMemoryItemsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `items`, assigning ids where unset
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let repo = Self::new();
        if let Ok(mut table) = repo.table.lock() {
            for item in items {
                if let Err(e) = insert_row(&mut table, item) {
                    log::warn!("Skipping seed item: {}", e);
                }
            }
        }
        repo
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, Table>> {
        lock_table(&self.table)
    }
}

fn lock_table(table: &Mutex<Table>) -> DomainResult<MutexGuard<'_, Table>> {
    table
        .lock()
        .map_err(|_| DomainError::Internal("item table lock poisoned".to_string()))
}

fn insert_row(table: &mut Table, mut item: Item) -> DomainResult<Option<u32>> {
    item.check_storable()?;
    if !item.has_id() {
        item.id = table.last_id.checked_add(1).ok_or_else(|| {
            DomainError::Storage(format!("Item id {} is out of range", u64::from(table.last_id) + 1))
        })?;
    } else if table.rows.contains_key(&item.id) {
        return Ok(None);
    }
    let id = item.id;
    table.last_id = table.last_id.max(id);
    table.rows.insert(id, item);
    Ok(Some(id))
}

#[async_trait]
impl ItemsRepository for InMemoryItemsRepository {
    fn get_all_items_stream(&self) -> QueryStream<Vec<Item>> {
        let table = self.table.clone();
        self.tracker
            .observe(move || future::ready(lock_table(&table).map(|t| t.sorted())))
    }

    fn get_item_stream(&self, id: u32) -> QueryStream<Option<Item>> {
        let table = self.table.clone();
        self.tracker
            .observe(move || future::ready(lock_table(&table).map(|t| t.rows.get(&id).cloned())))
    }

    async fn insert_item(&self, item: &Item) -> DomainResult<Option<u32>> {
        let inserted = insert_row(&mut *self.lock()?, item.clone())?;
        if inserted.is_some() {
            self.tracker.notify();
        }
        Ok(inserted)
    }

    async fn delete_item(&self, item: &Item) -> DomainResult<()> {
        let removed = self.lock()?.rows.remove(&item.id).is_some();
        if removed {
            self.tracker.notify();
        }
        Ok(())
    }

    async fn update_item(&self, item: &Item) -> DomainResult<()> {
        item.check_storable()?;
        let changed = {
            let mut table = self.lock()?;
            match table.rows.get_mut(&item.id) {
                Some(row) if row != item => {
                    *row = item.clone();
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.tracker.notify();
        }
        Ok(())
    }

    async fn reduce_quantity(&self, id: u32) -> DomainResult<bool> {
        let sold = match self.lock()?.rows.get_mut(&id) {
            Some(row) if row.quantity > 0 => {
                row.quantity -= 1;
                true
            }
            _ => false,
        };
        if sold {
            self.tracker.notify();
        }
        Ok(sold)
    }
}
