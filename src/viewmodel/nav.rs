//! Navigation destinations and route arguments
//!
//! Screens that show one item receive its id through the `itemId` route
//! argument; view-models read it from [`NavArgs`].

use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::{DomainError, DomainResult};

/// Route argument carrying the item id
pub const ITEM_ID_ARG: &str = "itemId";

/// Screens of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Home,
    ItemEntry,
    ItemDetails,
    ItemEdit,
}

impl Destination {
    pub const ALL: [Destination; 4] = [
        Destination::Home,
        Destination::ItemEntry,
        Destination::ItemDetails,
        Destination::ItemEdit,
    ];

    pub fn route(&self) -> &'static str {
        match self {
            Destination::Home => "home",
            Destination::ItemEntry => "item_entry",
            Destination::ItemDetails => "item_details",
            Destination::ItemEdit => "item_edit",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Destination::Home => "Inventory",
            Destination::ItemEntry => "Add Item",
            Destination::ItemDetails => "Item Details",
            Destination::ItemEdit => "Edit Item",
        }
    }

    pub fn takes_item_id(&self) -> bool {
        matches!(self, Destination::ItemDetails | Destination::ItemEdit)
    }

    /// Route pattern as registered with a router, e.g. `item_edit/{itemId}`
    pub fn route_with_args(&self) -> String {
        if self.takes_item_id() {
            format!("{}/{{{}}}", self.route(), ITEM_ID_ARG)
        } else {
            self.route().to_string()
        }
    }

    /// Concrete route for one item, e.g. `item_details/3`
    pub fn route_for(&self, item_id: u32) -> String {
        format!("{}/{}", self.route(), item_id)
    }
}

/// Arguments extracted from a matched route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavArgs {
    values: HashMap<String, String>,
}

impl NavArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments for a screen showing `item_id`
    pub fn for_item(item_id: u32) -> Self {
        Self::new().with(ITEM_ID_ARG, item_id.to_string())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(|v| v.parse().ok())
    }

    /// Typed lookup of an argument the screen cannot open without
    pub fn require<T: FromStr>(&self, key: &str) -> DomainResult<T> {
        let raw = self
            .values
            .get(key)
            .ok_or_else(|| DomainError::MissingArgument(key.to_string()))?;
        raw.parse().map_err(|_| {
            DomainError::InvalidInput(format!("argument {} has invalid value {:?}", key, raw))
        })
    }

    pub fn item_id(&self) -> DomainResult<u32> {
        self.require(ITEM_ID_ARG)
    }

    /// Match a concrete route such as `item_edit/4` against the known
    /// destinations.
    pub fn parse_route(route: &str) -> Option<(Destination, NavArgs)> {
        let (base, arg) = match route.split_once('/') {
            Some((base, arg)) => (base, Some(arg)),
            None => (route, None),
        };
        let dest = Destination::ALL.into_iter().find(|d| d.route() == base)?;

        match (dest.takes_item_id(), arg) {
            (true, Some(id)) if !id.is_empty() => Some((dest, NavArgs::new().with(ITEM_ID_ARG, id))),
            (false, None) => Some((dest, NavArgs::new())),
            _ => None,
        }
    }
}
