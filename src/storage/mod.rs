//! # Seen-set persistence
//!
//! The random no-repeat mode remembers which indices it has already shown in
//! the current cycle. That memory lives behind the [`SeenSetStore`] trait so the
//! selector never touches the filesystem directly.
//!
//! ## Stores
//!
//! - [`JsonFileStore`] - `<data_dir>/fortune-seen-v1.json`, guarded with fs2 file
//!   locks (shared for read, exclusive for write and for the whole of
//!   [`SeenSetStore::update`])
//! - [`MemoryStore`] - in-process store for tests and embedding
//!
//! ## Format
//!
//! The value is a JSON array of indices, e.g. `[4,0,17]`. The storage key
//! carries a version suffix ([`SEEN_STORAGE_KEY`]); a future format change gets a
//! new key so old data is ignored instead of misread.
//!
//! ## Failure posture
//!
//! [`SeenSetStore::get`] folds every failure (missing, unreadable, malformed)
//! into `None`. Writes return a [`StoreError`] that the selector logs and drops.

use fs2::FileExt;
use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Indices already shown in the current no-repeat cycle.
pub type SeenSet = BTreeSet<usize>;

/// Versioned storage key for the seen set.
pub const SEEN_STORAGE_KEY: &str = "fortune-seen-v1";

/// Errors a store may report on write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store does not accept writes.
    #[error("store is read-only")]
    ReadOnly,
}

/// Key-value capability holding one [`SeenSet`].
pub trait SeenSetStore {
    /// Load the persisted set. `None` when absent or unreadable.
    fn get(&self) -> Option<SeenSet>;

    /// Replace the persisted set.
    fn set(&mut self, seen: &SeenSet) -> Result<(), StoreError>;

    /// Forget the persisted set entirely.
    fn clear(&mut self) -> Result<(), StoreError> {
        self.set(&SeenSet::new())
    }

    /// Read, transform and write back as one step.
    ///
    /// `f` is called exactly once, with the current value (`None` when absent or
    /// unreadable), even when the write later fails. Stores shared between
    /// processes override this so nothing can slip in between the read and the
    /// write.
    fn update(
        &mut self,
        f: &mut dyn FnMut(Option<SeenSet>) -> SeenSet,
    ) -> Result<SeenSet, StoreError> {
        let next = f(self.get());
        self.set(&next)?;
        Ok(next)
    }
}

impl<T: SeenSetStore + ?Sized> SeenSetStore for &mut T {
    fn get(&self) -> Option<SeenSet> {
        (**self).get()
    }

    fn set(&mut self, seen: &SeenSet) -> Result<(), StoreError> {
        (**self).set(seen)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }

    fn update(
        &mut self,
        f: &mut dyn FnMut(Option<SeenSet>) -> SeenSet,
    ) -> Result<SeenSet, StoreError> {
        (**self).update(f)
    }
}

impl<T: SeenSetStore + ?Sized> SeenSetStore for Box<T> {
    fn get(&self) -> Option<SeenSet> {
        (**self).get()
    }

    fn set(&mut self, seen: &SeenSet) -> Result<(), StoreError> {
        (**self).set(seen)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }

    fn update(
        &mut self,
        f: &mut dyn FnMut(Option<SeenSet>) -> SeenSet,
    ) -> Result<SeenSet, StoreError> {
        (**self).update(f)
    }
}

/// Decode a persisted value. Anything but a JSON array of non-negative integers is `None`.
pub fn decode_seen(raw: &str) -> Option<SeenSet> {
    let cleaned = raw.trim_start_matches('\0').trim();
    if cleaned.is_empty() {
        return None;
    }
    match serde_json::from_str::<Vec<usize>>(cleaned) {
        Ok(indices) => Some(indices.into_iter().collect()),
        Err(e) => {
            log::warn!("seen-store: discarding malformed seen set: {}", e);
            None
        }
    }
}

/// Encode a seen set as a compact JSON array.
pub fn encode_seen(seen: &SeenSet) -> Result<String, StoreError> {
    Ok(serde_json::to_string(seen)?)
}

/// File-backed store: one JSON file per storage key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `<data_dir>/fortune-seen-v1.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_key(data_dir, SEEN_STORAGE_KEY)
    }

    /// Store at `<data_dir>/<key>.json`.
    pub fn with_key(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> std::io::Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }

    fn write_locked(&self, data: &str) -> Result<(), StoreError> {
        self.ensure_parent()?;
        let mut f = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        f.lock_exclusive()?;
        // Truncate only once the lock is held so a concurrent reader never sees a partial file.
        let result = rewrite(&mut f, data);
        let _ = f.unlock();
        Ok(result?)
    }

    fn open_for_update(&self) -> std::io::Result<fs::File> {
        self.ensure_parent()?;
        let f = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)?;
        f.lock_exclusive()?;
        Ok(f)
    }
}

fn rewrite(f: &mut fs::File, data: &str) -> std::io::Result<()> {
    f.seek(SeekFrom::Start(0))?;
    f.set_len(0)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    f.sync_all()
}

impl SeenSetStore for JsonFileStore {
    fn get(&self) -> Option<SeenSet> {
        let mut f = fs::OpenOptions::new().read(true).open(&self.path).ok()?;
        let _ = f.lock_shared();
        let mut s = String::new();
        let read = f.read_to_string(&mut s);
        let _ = f.unlock();
        if let Err(e) = read {
            log::warn!("seen-store: failed reading {:?}: {}", self.path, e);
            return None;
        }
        decode_seen(&s)
    }

    fn set(&mut self, seen: &SeenSet) -> Result<(), StoreError> {
        let data = encode_seen(seen)?;
        self.write_locked(&data)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // One exclusive lock spans the read, `f` and the rewrite.
    fn update(
        &mut self,
        f: &mut dyn FnMut(Option<SeenSet>) -> SeenSet,
    ) -> Result<SeenSet, StoreError> {
        let mut file = match self.open_for_update() {
            Ok(file) => file,
            Err(e) => {
                log::warn!("seen-store: cannot lock {:?}: {}", self.path, e);
                f(self.get());
                return Err(e.into());
            }
        };
        let mut s = String::new();
        let current = match file.read_to_string(&mut s) {
            Ok(_) => decode_seen(&s),
            Err(e) => {
                log::warn!("seen-store: failed reading {:?}: {}", self.path, e);
                None
            }
        };
        let next = f(current);
        let written = encode_seen(&next).and_then(|data| Ok(rewrite(&mut file, &data)?));
        let _ = file.unlock();
        written.map(|()| next)
    }
}

/// In-process store. Holds the raw serialized value so tests can plant corrupt data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
    read_only: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw persisted value (not validated).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Store pre-seeded with a set.
    pub fn with_seen(seen: &SeenSet) -> Self {
        Self {
            raw: encode_seen(seen).ok(),
            ..Self::default()
        }
    }

    /// Store whose writes always fail.
    pub fn read_only(raw: Option<String>) -> Self {
        Self {
            raw,
            read_only: true,
            writes: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SeenSetStore for MemoryStore {
    fn get(&self) -> Option<SeenSet> {
        self.raw.as_deref().and_then(decode_seen)
    }

    fn set(&mut self, seen: &SeenSet) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.raw = Some(encode_seen(seen)?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.raw = None;
        self.writes += 1;
        Ok(())
    }
}
