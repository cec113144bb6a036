use std::collections::BTreeMap;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::error::StoreResult;
use crate::store::KeyValueStore;
use crate::store::StoredValue;

/// Preference store kept as one JSON object on disk. Every read goes back to the file
/// so writes from another process are picked up. Writers serialize on an advisory lock
/// held on a `.lock` file next to the store, and each write replaces the file whole.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self { path };
        // Fail early on a file that is not a preference object.
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn load(&self) -> StoreResult<BTreeMap<String, StoredValue>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = std::fs::read(&self.path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice::<BTreeMap<String, StoredValue>>(&bytes)
            .map_err(|err| StoreError::Decode(format!("{}: {err}", self.path.display()).into()))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn save(&self, entries: &BTreeMap<String, StoredValue>) -> StoreResult<()> {
        let encoded = serde_json::to_vec_pretty(entries)
            .map_err(|err| StoreError::Encode(err.to_string().into()))?;
        // Unique per writer; created owner-only.
        let mut staging = NamedTempFile::new_in(self.staging_dir())?;
        staging.write_all(&encoded)?;
        staging.as_file().sync_all()?;
        staging.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, StoredValue>)) -> StoreResult<()> {
        let lock = open_private(&self.lock_path())?;
        lock.lock_exclusive()?;
        let mut entries = self.load()?;
        apply(&mut entries);
        // Closing the handle releases the lock.
        let saved = self.save(&entries);
        drop(lock);
        saved
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<StoredValue>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: StoredValue) -> StoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }
}

fn open_private(path: &Path) -> std::io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).truncate(false).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts.open(path)
}
