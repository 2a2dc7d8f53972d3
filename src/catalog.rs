// Read-only catalog lookups with parent/variant resolution

use crate::assets::AssetBase;
use crate::config::Config;
use crate::error::{Entity, Result, ShopError, require_id};
use crate::models::{Item, ItemSummary};
use crate::store::RecordStore;
use std::path::PathBuf;
use tracing::debug;

pub struct CatalogRepository {
    data_dir: PathBuf,
    assets: AssetBase,
}

impl CatalogRepository {
    pub fn new(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            assets: config.asset_base.clone(),
        }
    }

    /// Look up one item. Variants get `title`/`sub_title` from their parent
    /// unless they carry their own.
    pub fn get(&self, id: u64) -> Result<Item> {
        require_id(id, "item_id")?;

        let store = RecordStore::<Item>::open(&self.data_dir)?;
        let items = store.get()?;

        let item = find_item(items, id)?;
        let mut resolved = item.clone();
        if let Some(pid) = item.pid {
            let parent = find_parent(items, pid)?;
            resolved.title = resolved.title.or_else(|| parent.title.clone());
            resolved.sub_title = resolved.sub_title.or_else(|| parent.sub_title.clone());
        }

        Ok(resolved)
    }

    /// All items with asset paths turned into URLs.
    ///
    /// Album entries are rewritten on every item; `color` and `cover` only on
    /// variants.
    pub fn list(&self) -> Result<Vec<Item>> {
        let store = RecordStore::<Item>::open(&self.data_dir)?;
        let items = store.get()?;
        debug!(count = items.len(), "Listing items");

        Ok(items.iter().map(|item| self.rewrite_assets(item)).collect())
    }

    fn rewrite_assets(&self, item: &Item) -> Item {
        let mut item = item.clone();
        if let Some(album) = item.album.as_mut() {
            for path in album.iter_mut() {
                *path = self.assets.url(path);
            }
        }
        if item.is_variant() {
            item.color = self.assets.url_opt(item.color.as_deref());
            item.cover = self.assets.url_opt(item.cover.as_deref());
        }
        item
    }
}

pub(crate) fn find_item(items: &[Item], id: u64) -> Result<&Item> {
    items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| ShopError::not_found(Entity::Item, id))
}

fn find_parent(items: &[Item], pid: u64) -> Result<&Item> {
    items
        .iter()
        .find(|item| item.id == pid)
        .ok_or_else(|| ShopError::not_found(Entity::ParentItem, pid))
}

/// Cart-facing view of an item: asset URLs plus the display fields of its
/// parent. A top-level item stands in as its own parent.
pub(crate) fn summarize(items: &[Item], item: &Item, assets: &AssetBase) -> Result<ItemSummary> {
    let parent = match item.pid {
        Some(pid) => find_parent(items, pid)?,
        None => item,
    };

    Ok(ItemSummary {
        id: item.id,
        pid: item.pid,
        name: item.name.clone(),
        price: item.price.clone(),
        color: assets.url_opt(item.color.as_deref()),
        cover: assets.url_opt(item.cover.as_deref()),
        title: parent.title.clone(),
        sub_title: parent.sub_title.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    const ITEMS: &str = r#"[
        {"id":1,"title":"Phone","sub_title":"Flagship","album":["a1.jpg","a2.jpg"],"cover":"parent.jpg"},
        {"id":2,"pid":1,"name":"Phone Black","price":2999,"color":"black.png","cover":"black.jpg"},
        {"id":3,"pid":1,"name":"Phone White","title":"Snow","price":3099.5,"color":"white.png","cover":"white.jpg","album":["w1.jpg"]},
        {"id":4,"pid":99,"name":"Orphan","price":1,"color":"o.png","cover":"o.jpg"}
    ]"#;

    fn setup() -> (TempDir, CatalogRepository) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("item.json"), ITEMS).unwrap();
        let config = Config::new(temp.path()).with_asset_base("http://cdn.test/");
        let repo = CatalogRepository::new(&config);
        (temp, repo)
    }

    #[test]
    fn test_get_variant_inherits_parent_titles() {
        let (_temp, repo) = setup();

        let item = repo.get(2).unwrap();
        assert_eq!(item.title.as_deref(), Some("Phone"));
        assert_eq!(item.sub_title.as_deref(), Some("Flagship"));
        assert_eq!(item.name.as_deref(), Some("Phone Black"));
        assert_eq!(item.cover.as_deref(), Some("black.jpg"));
    }

    #[test]
    fn test_get_variant_own_title_wins() {
        let (_temp, repo) = setup();

        let item = repo.get(3).unwrap();
        assert_eq!(item.title.as_deref(), Some("Snow"));
        assert_eq!(item.sub_title.as_deref(), Some("Flagship"));
    }

    #[test]
    fn test_get_top_level_item() {
        let (_temp, repo) = setup();

        let item = repo.get(1).unwrap();
        assert_eq!(item.title.as_deref(), Some("Phone"));
        assert!(item.pid.is_none());
    }

    #[test]
    fn test_get_missing_item() {
        let (_temp, repo) = setup();

        match repo.get(42) {
            Err(ShopError::NotFound { entity, id }) => {
                assert_eq!(entity, Entity::Item);
                assert_eq!(id, "42");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_get_missing_parent() {
        let (_temp, repo) = setup();

        match repo.get(4) {
            Err(ShopError::NotFound { entity, .. }) => assert_eq!(entity, Entity::ParentItem),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_get_zero_id() {
        let (_temp, repo) = setup();
        assert_eq!(repo.get(0).unwrap_err().kind(), ErrorKind::MissingParameter);
    }

    #[test]
    fn test_list_rewrites_assets() {
        let (_temp, repo) = setup();

        let items = repo.list().unwrap();
        assert_eq!(items.len(), 4);

        // Top-level: album only
        let parent = &items[0];
        assert_eq!(
            parent.album.as_deref(),
            Some(&["http://cdn.test/a1.jpg".to_string(), "http://cdn.test/a2.jpg".to_string()][..])
        );
        assert_eq!(parent.cover.as_deref(), Some("parent.jpg"));

        // Variant: color, cover and album
        let variant = &items[2];
        assert_eq!(variant.color.as_deref(), Some("http://cdn.test/white.png"));
        assert_eq!(variant.cover.as_deref(), Some("http://cdn.test/white.jpg"));
        assert_eq!(variant.album.as_deref(), Some(&["http://cdn.test/w1.jpg".to_string()][..]));
        assert!(items[1].album.is_none());
    }

    #[test]
    fn test_list_does_not_write_back() {
        let (temp, repo) = setup();
        repo.list().unwrap();

        let content = fs::read_to_string(temp.path().join("item.json")).unwrap();
        assert_eq!(content, ITEMS);
    }

    #[test]
    fn test_list_unavailable() {
        let temp = TempDir::new().unwrap();
        let repo = CatalogRepository::new(&Config::new(temp.path()));
        assert_eq!(repo.list().unwrap_err().kind(), ErrorKind::StoreUnavailable);
    }
}
