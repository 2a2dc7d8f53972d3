// MockShop - e-commerce mock backend over flat JSON collections

pub mod account;
pub mod assets;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod record;
pub mod store;

// Re-export main types for convenience
pub use account::AccountRepository;
pub use assets::AssetBase;
pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use config::Config;
pub use error::{Entity, ErrorKind, Result, ShopError};
pub use models::{CartEntry, CartLine, Item, ItemSummary, Order, Session, User};
pub use record::Record;
pub use store::RecordStore;

/// Create every collection file that doesn't exist yet.
/// Returns the names of the collections that were created.
pub fn init_collections(config: &Config) -> Result<Vec<&'static str>> {
    let mut created = Vec::new();
    if RecordStore::<User>::create_if_missing(&config.data_dir)? {
        created.push(User::collection_name());
    }
    if RecordStore::<Item>::create_if_missing(&config.data_dir)? {
        created.push(Item::collection_name());
    }
    if RecordStore::<CartEntry>::create_if_missing(&config.data_dir)? {
        created.push(CartEntry::collection_name());
    }
    if RecordStore::<Order>::create_if_missing(&config.data_dir)? {
        created.push(Order::collection_name());
    }
    Ok(created)
}
