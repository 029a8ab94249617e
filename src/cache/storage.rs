use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Errors surfaced by the persisted key-value storage boundary
///
/// These never leave the cache layer; [`super::Cache`] swallows them and
/// degrades to a miss or a dropped write.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage is full")]
    Full,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persisted key-value storage boundary used by the cache
///
/// Mirrors the minimal surface of a browser-style local store: string keys,
/// string values, enumeration, and a write that can be rejected for capacity.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, key: &str) -> StorageResult<Option<String>>;
    async fn write(&self, key: &str, value: &str) -> StorageResult<()>;
    async fn remove(&self, key: &str) -> StorageResult<()>;
    async fn keys(&self) -> StorageResult<Vec<String>>;
}

/// In-process storage, optionally bounded by entry count
///
/// The capacity bound exists so the cache's evict-and-retry path is
/// exercisable without a real storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().expect("storage lock poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().expect("storage lock poisoned");
        if let Some(capacity) = self.capacity {
            if entries.len() >= capacity && !entries.contains_key(key) {
                return Err(StorageError::Full);
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().expect("storage lock poisoned");
        entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = self.entries.lock().expect("storage lock poisoned");
        Ok(entries.keys().cloned().collect())
    }
}

/// File-backed storage persisting the whole key-value map as one JSON file
///
/// Cross-session analog of browser local storage. Every write rewrites the
/// file; fine at the scale of a handful of cached result sets.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> StorageResult<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        let contents = serde_json::to_string(entries)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            // A full disk surfaces as a capacity rejection so the cache can
            // run its expiry sweep and retry.
            if e.raw_os_error() == Some(28) {
                StorageError::Full
            } else {
                StorageError::Io(e)
            }
        })
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.load().await?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = self.load().await?;
        Ok(entries.keys().cloned().collect())
    }
}
