// Data models for the shop collections

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Catalog item. Variants point at their product through `pid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<Vec<String>>,
    /// Fields this crate doesn't interpret, kept for the next save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn is_variant(&self) -> bool {
        self.pid.is_some()
    }
}

/// One line of a user's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: u64,
    pub uid: u64,
    #[serde(rename = "itemId")]
    pub item_id: u64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartEntry {
    /// Absent counts as unchecked
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }

    pub fn matches_item(&self, uid: u64, item_id: u64) -> bool {
        self.uid == uid && self.item_id == item_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub profile: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub uid: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Item details attached to a cart entry when listing a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: u64,
    pub pid: Option<u64>,
    pub name: Option<String>,
    pub price: Option<Number>,
    pub color: Option<String>,
    pub cover: Option<String>,
    pub title: Option<String>,
    pub sub_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub entry: CartEntry,
    pub item: ItemSummary,
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: u64,
    pub username: String,
}

impl Record for Item {
    fn id(&self) -> u64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "item"
    }
}

impl Record for CartEntry {
    fn id(&self) -> u64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "cart"
    }
}

impl Record for User {
    fn id(&self) -> u64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "user"
    }
}

impl Record for Order {
    fn id(&self) -> u64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "order"
    }
}
