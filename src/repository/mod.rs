//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod invalidation;
mod item_dao;
mod offline_repo;
mod memory_repo;


pub use traits::ItemsRepository;
pub use db::{init_db, Database, IN_MEMORY, SCHEMA_VERSION};
pub use invalidation::{InvalidationTracker, QueryStream};
pub use item_dao::ItemDao;
pub use offline_repo::OfflineItemsRepository;
pub use memory_repo::InMemoryItemsRepository;
