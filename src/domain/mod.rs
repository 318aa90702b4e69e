//! Domain Layer
//!
//! Contains the item entity, its editable form projection and the
//! shared error type.

mod entity;
mod item;
mod item_details;

pub use entity::{Entity, DomainError, DomainResult};
pub use item::{Item, UNASSIGNED_ID};
pub use item_details::ItemDetails;
