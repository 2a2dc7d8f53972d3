// Flat JSON collection store: one array per file, rewritten whole on save

use crate::error::{Result, ShopError};
use crate::record::Record;
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// In-memory state of a collection between load and save
#[derive(Debug, Clone, PartialEq)]
enum Snapshot<T> {
    Loaded(Vec<T>),
    /// The file was missing or failed to decode
    Unavailable(String),
}

/// Handle on one collection file
///
/// A handle is meant to live for a single operation: open (which loads),
/// read or mutate the snapshot, save, drop. Nothing is cached between handles.
#[derive(Debug)]
pub struct RecordStore<T: Record> {
    collection: &'static str,
    path: PathBuf,
    snapshot: Snapshot<T>,
}

impl<T: Record> RecordStore<T> {
    /// Open the collection for `T` under `data_dir` and load it
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let collection = T::collection_name();
        validate_collection_name(collection)?;

        let mut store = Self {
            collection,
            path: collection_path(data_dir.as_ref(), collection),
            snapshot: Snapshot::Unavailable("not loaded".to_string()),
        };
        store.load();
        Ok(store)
    }

    /// Write an empty collection if the backing file doesn't exist yet.
    /// Returns true when a file was created.
    pub fn create_if_missing<P: AsRef<Path>>(data_dir: P) -> Result<bool> {
        let collection = T::collection_name();
        validate_collection_name(collection)?;

        let data_dir = data_dir.as_ref();
        let path = collection_path(data_dir, collection);
        if path.exists() {
            return Ok(false);
        }

        fs::create_dir_all(data_dir)?;
        write_locked(&path, b"[]")?;
        info!(collection, path = ?path, "Created empty collection");
        Ok(true)
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, replacing the snapshot.
    ///
    /// A missing or undecodable file leaves the snapshot unavailable rather
    /// than empty; `get` and friends report it as `StoreUnavailable`.
    pub fn load(&mut self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                debug!(collection = self.collection, path = ?self.path, error = ?e, "Collection file not readable");
                self.snapshot = Snapshot::Unavailable(e.to_string());
                return;
            }
        };

        self.snapshot = match serde_json::from_str::<Vec<T>>(&content) {
            Ok(records) => {
                debug!(collection = self.collection, count = records.len(), "Loaded collection");
                Snapshot::Loaded(records)
            }
            Err(e) => {
                warn!(collection = self.collection, path = ?self.path, error = ?e, "Failed to parse collection");
                Snapshot::Unavailable(e.to_string())
            }
        };
    }

    pub fn is_available(&self) -> bool {
        matches!(self.snapshot, Snapshot::Loaded(_))
    }

    /// Current snapshot
    pub fn get(&self) -> Result<&[T]> {
        match &self.snapshot {
            Snapshot::Loaded(records) => Ok(records),
            Snapshot::Unavailable(reason) => Err(self.unavailable(reason)),
        }
    }

    /// Current snapshot, for in-place mutation before `save(None)`
    pub fn get_mut(&mut self) -> Result<&mut Vec<T>> {
        match &mut self.snapshot {
            Snapshot::Loaded(records) => Ok(records),
            Snapshot::Unavailable(reason) => Err(ShopError::StoreUnavailable {
                collection: self.collection.to_string(),
                reason: reason.clone(),
            }),
        }
    }

    /// Largest id in the snapshot. `None` means the collection is empty.
    pub fn max_id(&self) -> Result<Option<u64>> {
        Ok(self.get()?.iter().map(|record| record.id()).max())
    }

    /// Id for the next appended record, starting at 1 for an empty collection
    pub fn next_id(&self) -> Result<u64> {
        match self.max_id()? {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                ShopError::InvalidState(format!("no id left after {} in collection '{}'", max, self.collection))
            }),
        }
    }

    /// Persist the whole collection.
    ///
    /// With `Some(records)` the snapshot is replaced first, which also makes
    /// an unavailable store usable again. With `None` the current snapshot is
    /// written as-is.
    pub fn save(&mut self, records: Option<Vec<T>>) -> Result<()> {
        if let Some(records) = records {
            self.snapshot = Snapshot::Loaded(records);
        }

        let records = self.get()?;
        let json = serde_json::to_vec(records)?;
        write_locked(&self.path, &json)?;

        debug!(collection = self.collection, count = records.len(), "Saved collection");
        Ok(())
    }

    fn unavailable(&self, reason: &str) -> ShopError {
        ShopError::StoreUnavailable {
            collection: self.collection.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn collection_path(data_dir: &Path, collection: &str) -> PathBuf {
    data_dir.join(format!("{}.json", collection))
}

/// Replace `path` with `content`.
///
/// The bytes go to a temp file in the same directory which is then renamed
/// over the target, so readers see either the old or the new collection and
/// a crash mid-write leaves the old file intact. Writers serialize on an
/// exclusive lock of `<path>.lock`.
fn write_locked(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let lock = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path(path))?;
    lock.lock_exclusive()?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    // Lock is released when `lock` is dropped
    Ok(())
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ShopError::InvalidCollection("Collection name cannot be empty".to_string()));
    }
    if name.len() > 64 {
        return Err(ShopError::InvalidCollection(format!(
            "Collection name too long: {} (max 64 chars)",
            name
        )));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ShopError::InvalidCollection(format!(
            "Invalid collection name: {} (must be alphanumeric with _/-)",
            name
        )));
    }
    Ok(())
}
