//! Item Data Access
//!
//! SQL for the `items` table. Writes bump the database's invalidation
//! tracker when they change a row; reads come back as live query streams.

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Item};
use super::db::Database;
use super::invalidation::QueryStream;

const SELECT_COLUMNS: &str = "SELECT id, name, price, quantity FROM items";

/// Data access object for the `items` table
#[derive(Clone)]
pub struct ItemDao {
    db: Database,
}

impl ItemDao {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a row. An unassigned id (0) gets a fresh one; an id that is
    /// already taken leaves the existing row alone.
    ///
    /// Returns the id of the inserted row, or `None` if it was ignored.
    pub async fn insert(&self, item: &Item) -> DomainResult<Option<u32>> {
        item.check_storable()?;
        let requested = item.id;
        let item = item.clone();
        let inserted = self
            .db
            .call(move |conn| {
                let tx = conn.transaction()?;
                let changed = tx.execute(
                    "INSERT INTO items (id, name, price, quantity) VALUES (NULLIF(?1, 0), ?2, ?3, ?4)
                     ON CONFLICT(id) DO NOTHING",
                    params![item.id, item.name, item.price, item.quantity],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                // Dropping the transaction rolls the row back.
                let rowid = tx.last_insert_rowid();
                let id = u32::try_from(rowid).map_err(|_| {
                    DomainError::Storage(format!("Item id {} is out of range", rowid))
                })?;
                tx.commit()?;
                Ok(Some(id))
            })
            .await?;

        match inserted {
            Some(id) => {
                log::debug!("Inserted item {}", id);
                self.db.tracker.notify();
            }
            None => log::debug!("Ignored insert of existing item {}", requested),
        }
        Ok(inserted)
    }

    /// Replace the fields of the row with `item.id`; no-op if absent
    pub async fn update(&self, item: &Item) -> DomainResult<()> {
        item.check_storable()?;
        let item = item.clone();
        let id = item.id;
        let changed = self
            .db
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE items SET name = ?1, price = ?2, quantity = ?3 WHERE id = ?4",
                    params![item.name, item.price, item.quantity, item.id],
                )?)
            })
            .await?;

        self.after_write("Updated", id, changed);
        Ok(())
    }

    /// Remove the row with `item.id`; no-op if absent
    pub async fn delete(&self, item: &Item) -> DomainResult<()> {
        let id = item.id;
        let changed = self
            .db
            .call(move |conn| Ok(conn.execute("DELETE FROM items WHERE id = ?1", params![id])?))
            .await?;

        self.after_write("Deleted", id, changed);
        Ok(())
    }

    /// Take one unit out of stock in a single statement.
    ///
    /// Returns `false` when the row is missing or already out of stock.
    pub async fn reduce_quantity(&self, id: u32) -> DomainResult<bool> {
        let changed = self
            .db
            .call(move |conn| {
                Ok(conn.execute(
                    "UPDATE items SET quantity = quantity - 1 WHERE id = ?1 AND quantity > 0",
                    params![id],
                )?)
            })
            .await?;

        if changed == 0 {
            log::debug!("Nothing to sell: item {} is missing or out of stock", id);
            return Ok(false);
        }
        log::debug!("Sold one of item {}", id);
        self.db.tracker.notify();
        Ok(true)
    }

    /// Live view of one row; `None` while it does not exist
    pub fn get_item(&self, id: u32) -> QueryStream<Option<Item>> {
        let conn = self.db.conn.clone();
        self.db.tracker.observe(move || {
            let conn = conn.clone();
            async move { run_query(conn, move |c| find_item(c, id)).await }
        })
    }

    /// Live view of every row, ordered by name
    pub fn get_all_items(&self) -> QueryStream<Vec<Item>> {
        let conn = self.db.conn.clone();
        self.db.tracker.observe(move || {
            let conn = conn.clone();
            async move { run_query(conn, list_items).await }
        })
    }

    fn after_write(&self, action: &str, id: u32, changed: usize) {
        if changed == 0 {
            log::debug!("{} nothing: item {} does not exist", action, id);
            return;
        }
        log::debug!("{} item {}", action, id);
        self.db.tracker.notify();
    }
}

// Streams hold only the connection, so dropping the database ends them.
async fn run_query<F, T>(conn: Arc<Mutex<Connection>>, f: F) -> DomainResult<T>
where
    F: FnOnce(&Connection) -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    let guard = conn.lock_owned().await;
    tokio::task::spawn_blocking(move || f(&*guard)).await?
}

fn find_item(conn: &Connection, id: u32) -> DomainResult<Option<Item>> {
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_item).optional()?)
}

fn list_items(conn: &Connection) -> DomainResult<Vec<Item>> {
    let sql = format!("{} ORDER BY name ASC, id ASC", SELECT_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    let items = stmt
        .query_map([], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

/// Convert a database row to Item
fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        quantity: row.get(3)?,
    })
}
