use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rocksdb::{DB, Options};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Key under which the deployed contract address is persisted.
pub const CONTRACT_ADDRESS_KEY: &str = "bookbase.addr.v2";

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn save_setting(&self, key: &str, value: &str) -> Result<()>;
    async fn load_setting(&self, key: &str) -> Result<Option<String>>;
}

/// Backend used when no durable storage is available.
#[derive(Default)]
pub struct NoopSettingsStore;

#[async_trait]
impl SettingsStore for NoopSettingsStore {
    async fn save_setting(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    async fn load_setting(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.values.write().await;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn load_setting(&self, key: &str) -> Result<Option<String>> {
        let guard = self.values.read().await;
        Ok(guard.get(key).cloned())
    }
}

pub struct RocksDbSettingsStore {
    db: Arc<DB>,
}

impl RocksDbSettingsStore {
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn key_for_setting(key: &str) -> String {
        format!("setting:{key}")
    }
}

#[async_trait]
impl SettingsStore for RocksDbSettingsStore {
    async fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        let key = Self::key_for_setting(key);
        self.db.put(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    async fn load_setting(&self, key: &str) -> Result<Option<String>> {
        let key = Self::key_for_setting(key);
        match self.db.get(key.as_bytes())? {
            Some(raw) => {
                let value = String::from_utf8(raw)
                    .map_err(|err| anyhow!("setting {key} is not valid UTF-8: {err}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

/// Persists the deployed contract address.
///
/// Backend failures never surface: `load` degrades to absent and `save`
/// to a no-op, each with a warning.
#[derive(Clone)]
pub struct ContractConfigStore {
    backend: Arc<dyn SettingsStore>,
}

impl ContractConfigStore {
    pub fn new(backend: Arc<dyn SettingsStore>) -> Self {
        Self { backend }
    }

    /// Opens RocksDB at `path`, falling back to the no-op backend when the
    /// directory cannot be opened.
    pub fn open_or_noop(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match RocksDbSettingsStore::open_default(path) {
            Ok(store) => Self::new(Arc::new(store)),
            Err(err) => {
                warn!(
                    "config storage unavailable at {}: {}. Contract address will not persist",
                    path.display(),
                    err
                );
                Self::new(Arc::new(NoopSettingsStore))
            }
        }
    }

    pub async fn load(&self) -> Option<String> {
        match self.backend.load_setting(CONTRACT_ADDRESS_KEY).await {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                warn!("failed to load contract address: {}", err);
                None
            }
        }
    }

    pub async fn save(&self, address: &str) {
        if let Err(err) = self.backend.save_setting(CONTRACT_ADDRESS_KEY, address).await {
            warn!("failed to save contract address: {}", err);
        }
    }
}
