use crate::errors::StorageError;
use crate::models::{History, Settings, StoredSettings};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::{env, fs, io::ErrorKind, path::PathBuf};
use tracing::{debug, warn};

pub const HISTORY_KEY: &str = "history";
pub const SETTINGS_KEY: &str = "settings";

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

/// Whole-value get/set/remove store. There is no partial update primitive.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|err| io_error(key, err))?;
        fs::write(self.path_for(key), value).map_err(|err| io_error(key, err))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}

/// In-memory store. Clones share contents, so a test can keep a handle
/// and inspect what the tracker wrote, or make writes fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, like a full browser quota.
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock().values.insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.read_only {
            return Err(StorageError::Unavailable(format!("quota exceeded writing '{key}'")));
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.lock().values.remove(key);
        Ok(())
    }
}

/// Typed access to the two JSON blobs the tracker keeps.
pub struct StorageAdapter {
    store: Box<dyn KeyValueStore>,
}

impl StorageAdapter {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn load_history(&self) -> Result<History, StorageError> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                    key: HISTORY_KEY.to_string(),
                    source,
                })
            }
            _ => Ok(History::new()),
        }
    }

    pub fn load_settings(&self) -> Result<Option<Settings>, StorageError> {
        match self.store.get(SETTINGS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => {
                let stored: StoredSettings =
                    serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                        key: SETTINGS_KEY.to_string(),
                        source,
                    })?;
                Ok(Some(Settings {
                    daily_goal: stored.daily_goal,
                    max_goal: stored.max_goal,
                }))
            }
            _ => Ok(None),
        }
    }

    pub fn save_history(&mut self, history: &History) -> Result<(), StorageError> {
        let payload =
            serde_json::to_string(history).map_err(|source| StorageError::Serialize {
                key: HISTORY_KEY.to_string(),
                source,
            })?;
        self.store.set(HISTORY_KEY, &payload)?;
        debug!(days = history.len(), "history persisted");
        Ok(())
    }

    pub fn save_settings(&mut self, settings: &Settings, saved_at: String) -> Result<(), StorageError> {
        let stored = StoredSettings {
            daily_goal: settings.daily_goal,
            max_goal: settings.max_goal,
            last_saved: Some(saved_at),
        };
        let payload =
            serde_json::to_string(&stored).map_err(|source| StorageError::Serialize {
                key: SETTINGS_KEY.to_string(),
                source,
            })?;
        self.store.set(SETTINGS_KEY, &payload)
    }

    /// Removes both blobs. Both removals are attempted even if the first fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let history = self.store.remove(HISTORY_KEY);
        let settings = self.store.remove(SETTINGS_KEY);
        if let Err(err) = &history {
            warn!("failed to remove history: {err}");
        }
        history.and(settings)
    }
}
