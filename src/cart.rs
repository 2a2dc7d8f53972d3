// Cart operations over the `cart` collection
//
// Every operation opens its own store handle, loads, mutates, saves and drops
// it. Two operations never share a snapshot.

use crate::assets::AssetBase;
use crate::catalog::{find_item, summarize};
use crate::config::Config;
use crate::error::{Entity, Result, ShopError, require_id};
use crate::models::{CartEntry, CartLine, Item};
use crate::store::RecordStore;
use serde_json::Map;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct CartRepository {
    data_dir: PathBuf,
    assets: AssetBase,
}

impl CartRepository {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            assets: config.asset_base.clone(),
        }
    }

    fn open(&self) -> Result<RecordStore<CartEntry>> {
        RecordStore::open(&self.data_dir)
    }

    /// Put one more of `item_id` in the user's cart.
    ///
    /// Bumps the quantity of an existing entry, otherwise appends a new entry
    /// with quantity 1. Returns the entry as saved.
    pub fn add(&self, uid: u64, item_id: u64) -> Result<CartEntry> {
        require_id(uid, "uid")?;
        require_id(item_id, "item_id")?;

        let mut store = self.open()?;
        let existing = store.get()?.iter().position(|cart| cart.matches_item(uid, item_id));

        let entry = match existing {
            Some(index) => {
                let cart = &mut store.get_mut()?[index];
                cart.quantity = cart.quantity.checked_add(1).ok_or_else(|| {
                    ShopError::InvalidState(format!("quantity of cart entry {} is at its maximum", cart.id))
                })?;
                cart.clone()
            }
            None => {
                let next_id = store.next_id()?;
                let carts = store.get_mut()?;
                let cart = CartEntry {
                    id: next_id,
                    uid,
                    item_id,
                    quantity: 1,
                    checked: None,
                    extra: Map::new(),
                };
                carts.push(cart.clone());
                cart
            }
        };
        store.save(None)?;

        info!(uid, item_id, cart_id = entry.id, quantity = entry.quantity, "Added to cart");
        Ok(entry)
    }

    /// Flip the checked flag of one cart entry, addressed by its cart id
    pub fn toggle(&self, uid: u64, cart_id: u64) -> Result<CartEntry> {
        require_id(uid, "uid")?;
        require_id(cart_id, "cart_id")?;

        let mut store = self.open()?;
        let cart = store
            .get_mut()?
            .iter_mut()
            .find(|cart| cart.uid == uid && cart.id == cart_id)
            .ok_or_else(|| ShopError::not_found(Entity::CartEntry, cart_id))?;

        cart.checked = Some(!cart.is_checked());
        let entry = cart.clone();
        store.save(None)?;

        debug!(uid, cart_id, checked = ?entry.checked, "Toggled cart entry");
        Ok(entry)
    }

    /// Set the checked flag on every entry the user owns. Other users'
    /// entries are saved back untouched. Returns how many entries were set.
    pub fn toggle_all(&self, uid: u64, checked: bool) -> Result<usize> {
        require_id(uid, "uid")?;

        let mut store = self.open()?;
        let mut count = 0;
        for cart in store.get_mut()?.iter_mut().filter(|cart| cart.uid == uid) {
            cart.checked = Some(checked);
            count += 1;
        }
        store.save(None)?;

        debug!(uid, checked, count, "Toggled all cart entries");
        Ok(count)
    }

    /// Take one off the quantity. Refuses to go below 1: dropping the entry
    /// is `clear_one`'s job.
    pub fn decrement(&self, uid: u64, item_id: u64) -> Result<CartEntry> {
        require_id(uid, "uid")?;
        require_id(item_id, "item_id")?;

        let mut store = self.open()?;
        let cart = store
            .get_mut()?
            .iter_mut()
            .find(|cart| cart.matches_item(uid, item_id))
            .ok_or_else(|| ShopError::not_found(Entity::CartEntry, item_id))?;

        if cart.quantity <= 1 {
            return Err(ShopError::InvalidState(format!(
                "quantity of cart entry {} cannot go below 1",
                cart.id
            )));
        }

        cart.quantity -= 1;
        let entry = cart.clone();
        store.save(None)?;

        debug!(uid, item_id, quantity = entry.quantity, "Decremented cart entry");
        Ok(entry)
    }

    /// Remove the user's entries for `item_id`. Saves even when nothing matched.
    pub fn clear_one(&self, uid: u64, item_id: u64) -> Result<usize> {
        require_id(uid, "uid")?;
        require_id(item_id, "item_id")?;

        self.remove_where(|cart| cart.matches_item(uid, item_id))
    }

    /// Remove the user's checked entries
    pub fn clear_checked(&self, uid: u64) -> Result<usize> {
        require_id(uid, "uid")?;

        self.remove_where(|cart| cart.uid == uid && cart.is_checked())
    }

    /// Empty the user's cart
    pub fn clear_all(&self, uid: u64) -> Result<usize> {
        require_id(uid, "uid")?;

        self.remove_where(|cart| cart.uid == uid)
    }

    fn remove_where<F>(&self, remove: F) -> Result<usize>
    where
        F: Fn(&CartEntry) -> bool,
    {
        let mut store = self.open()?;
        let carts = store.get()?;
        let before = carts.len();
        let kept: Vec<CartEntry> = carts.iter().filter(|&cart| !remove(cart)).cloned().collect();
        let removed = before - kept.len();
        store.save(Some(kept))?;

        debug!(removed, "Removed cart entries");
        Ok(removed)
    }

    /// The user's entries, each with a summary of the item it points at.
    ///
    /// An entry whose item (or the item's parent) is missing fails the whole
    /// listing with `NotFound`.
    pub fn list(&self, uid: u64) -> Result<Vec<CartLine>> {
        require_id(uid, "uid")?;

        let carts = self.open()?;
        let mine: Vec<&CartEntry> = carts.get()?.iter().filter(|cart| cart.uid == uid).collect();
        if mine.is_empty() {
            return Ok(Vec::new());
        }

        let items = RecordStore::<Item>::open(&self.data_dir)?;
        let items = items.get()?;

        mine.into_iter()
            .map(|cart| -> Result<CartLine> {
                let item = find_item(items, cart.item_id)?;
                Ok(CartLine {
                    entry: cart.clone(),
                    item: summarize(items, item, &self.assets)?,
                })
            })
            .collect()
    }
}
