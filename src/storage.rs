use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persisted key holding the bearer token.
pub const TOKEN_KEY: &str = "access_token";
/// Persisted key holding the serialized user profile.
pub const USER_KEY: &str = "user";

// 1. KeyValueStore Contract
/// KeyValueStore
///
/// The client-side storage contract (the `localStorage` surface). The session store and
/// the HTTP client share one instance so that a 401 teardown and a logout clear the same
/// token/user pair.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// StoreState
///
/// The shared handle used by every service that reads or writes persisted session data.
pub type StoreState = Arc<dyn KeyValueStore>;

// 2. The Durable Implementation
/// FileStore
///
/// Write-through JSON file store. The whole map is rewritten on every mutation, which is
/// fine for the two keys this client persists. A missing or corrupt file starts empty.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// open
    ///
    /// Loads the existing map from `path`, if any.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "Discarding unreadable session file: {}", e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file each flush is staged in before it replaces the session file.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        let staging = self.staging_path();
        let result = serde_json::to_string_pretty(entries)
            .map_err(|e| e.to_string())
            .and_then(|raw| fs::write(&staging, raw).map_err(|e| e.to_string()))
            .and_then(|_| fs::rename(&staging, &self.path).map_err(|e| e.to_string()));

        if let Err(e) = result {
            let _ = fs::remove_file(&staging);
            // Storage failures must not break the UI; the in-memory copy stays authoritative.
            tracing::error!(path = %self.path.display(), "Failed to persist session: {}", e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove_item(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}

// 3. The In-Memory Implementation (For Tests and Ephemeral Sessions)
/// MemoryStore
///
/// Nothing survives the process. Used by tests and by local runs without a session file.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// clear_session
///
/// Removes the token and the cached user as a pair.
pub fn clear_session(store: &dyn KeyValueStore) {
    store.remove_item(TOKEN_KEY);
    store.remove_item(USER_KEY);
}
